use std::path::PathBuf;
use std::sync::Once;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};
use tower::ServiceExt;

use dhadkan_api::api::{create_application, state::AppState};
use dhadkan_api::config::AppConfig;
use dhadkan_data::models::NewAdmin;
use dhadkan_data::repository::{AdminRepository, AdminRepositoryTrait};
use dhadkan_domain::auth::hash_password;
use dhadkan_domain::database::{initialize_in_memory_pool, DatabasePool};

// Ensure tracing is initialized only once
static INIT: Once = Once::new();

fn initialize() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

struct TestApp {
    router: Router,
    pool: DatabasePool,
    upload_dir: PathBuf,
}

impl TestApp {
    fn new() -> Self {
        initialize();
        let pool = initialize_in_memory_pool().expect("in-memory pool");
        let upload_dir = std::env::temp_dir().join(format!("dhadkan-uploads-{}", uuid::Uuid::new_v4()));
        let config = AppConfig {
            upload_dir: upload_dir.to_string_lossy().to_string(),
            bcrypt_cost: 4,
            ..AppConfig::default()
        };

        Self {
            router: create_application(AppState::new(pool.clone(), &config)),
            pool,
            upload_dir,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    /// Register a doctor and return its id
    async fn doctor(&self, email: &str, phone: &str) -> i64 {
        let (status, json) = self
            .post(
                "/api/add-doctor",
                json!({
                    "doctorName": "A. Singh",
                    "email": email,
                    "phoneNo": phone,
                    "password": "secret1",
                    "hospitalType": "Government",
                    "hospitalname": "District Hospital"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", json);
        json["data"]["id"].as_i64().unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

fn child_form(doctor_id: i64, mobile: &str) -> Value {
    json!({
        "name": "Asha",
        "age": "9",
        "gender": "महिला",
        "fatherName": "Ramesh",
        "mobileNo": mobile,
        "schoolName": "GPS Rampur",
        "heartStatus": "संदिग्ध",
        "dr_id": doctor_id,
        "haveAadhar": "yes",
        "haveShramik": "no"
    })
}

#[tokio::test]
async fn test_register_doctor() {
    let app = TestApp::new();

    let (status, json) = app
        .post(
            "/api/add-doctor",
            json!({
                "doctorName": "A. Singh",
                "email": "a@x.com",
                "phoneNo": "9876543210",
                "password": "secret1"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert!(json["data"]["id"].as_i64().unwrap() > 0);
    assert_eq!(json["data"]["email"], "a@x.com");
    assert_eq!(json["data"]["phoneNo"], "9876543210");
    assert_eq!(json["data"]["experience"], 0);
    assert!(json["data"].get("password").is_none());
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = TestApp::new();
    app.doctor("a@x.com", "9876543210").await;

    let (status, json) = app
        .post(
            "/api/doctor-management?action=add",
            json!({
                "doctorName": "B. Rao",
                "email": "a@x.com",
                "phoneNo": "9876543211",
                "password": "secret1"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Doctor with this email already exists");

    let (status, _) = app
        .post(
            "/api/add-doctor",
            json!({
                "doctorName": "C. Das",
                "email": "A@X.COM",
                "phoneNo": "9876543212",
                "password": "secret1"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_bad_phone_is_rejected_without_insert() {
    let app = TestApp::new();

    let (status, json) = app
        .post(
            "/api/add-doctor",
            json!({
                "doctorName": "A. Singh",
                "email": "a@x.com",
                "phoneNo": "987654321",
                "password": "secret1"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Phone number must be exactly 10 digits");

    let (status, json) = app.get("/api/doctor-management").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_missing_field_and_invalid_json() {
    let app = TestApp::new();

    let (status, json) = app
        .post("/api/add-doctor", json!({"doctorName": "A. Singh", "email": "a@x.com"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Missing required field: phoneNo");

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_doctor_login() {
    let app = TestApp::new();
    let id = app.doctor("a@x.com", "9876543210").await;

    let (status, json) = app
        .post(
            "/api/login",
            json!({"email": "a@x.com", "password": "secret1", "userType": "doctor"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["token"].as_str().unwrap().len(), 64);
    assert_eq!(json["data"]["user"]["id"], id);
    assert_eq!(json["data"]["user"]["userType"], "doctor");

    let (status, json) = app
        .post(
            "/api/login",
            json!({"email": "A@X.com", "password": "secret1", "userType": "doctor"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["user"]["id"], id);

    let (status, json) = app
        .post(
            "/api/login",
            json!({"email": "a@x.com", "password": "wrong", "userType": "doctor"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Invalid password");

    let (status, _) = app
        .post(
            "/api/login",
            json!({"email": "a@x.com", "password": "secret1", "userType": "nurse"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_login() {
    let app = TestApp::new();
    AdminRepository::new(app.pool.clone())
        .create(NewAdmin {
            name: "Admin".to_string(),
            email: "admin@x.com".to_string(),
            password_hash: hash_password("admin123", 4).await.unwrap(),
            role: "admin".to_string(),
            created_at: "2025-01-01 00:00:00".to_string(),
        })
        .await
        .unwrap();

    let (status, json) = app
        .post(
            "/api/login",
            json!({"email": "admin@x.com", "password": "admin123", "userType": "admin"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["user"]["role"], "admin");

    let (status, json) = app
        .post(
            "/api/login",
            json!({"email": "nobody@x.com", "password": "admin123", "userType": "admin"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "User not found");
}

#[tokio::test]
async fn test_child_intake_and_duplicate_mobile() {
    let app = TestApp::new();
    let doctor = app.doctor("a@x.com", "9876543210").await;

    let (status, json) = app.post("/api/add-child-report", child_form(doctor, "9000000001")).await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    assert_eq!(json["data"]["age"], 9);
    assert_eq!(json["data"]["category"], "child");
    assert_eq!(json["data"]["mobileNo"], "9000000001");

    let (status, json) = app.post("/api/add-child-report", child_form(doctor, "9000000001")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["message"], "Mobile number already exists");
}

#[tokio::test]
async fn test_child_intake_validation() {
    let app = TestApp::new();
    let doctor = app.doctor("a@x.com", "9876543210").await;

    let mut form = child_form(doctor, "9000000001");
    form["gender"] = json!("female");
    let (status, json) = app.post("/api/add-child-report", form).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["message"], "Invalid gender value");

    let mut form = child_form(doctor, "9000000001");
    form.as_object_mut().unwrap().remove("fatherName");
    let (status, json) = app.post("/api/add-child-report", form).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["message"], "Missing required field: fatherName");

    let (status, json) = app.post("/api/add-child-report", child_form(999, "9000000001")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["message"], "Doctor not found");
}

#[tokio::test]
async fn test_staff_intake_with_photo() {
    let app = TestApp::new();
    let doctor = app.doctor("a@x.com", "9876543210").await;

    let mut form = child_form(doctor, "9000000002");
    form.as_object_mut().unwrap().remove("fatherName");
    form["category"] = json!("employee");
    form["aadharPhoto"] = json!({"name": "card.png", "data": STANDARD.encode(b"png-bytes")});

    let (status, json) = app.post("/api/add-teacher-emp-report", form.clone()).await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    assert_eq!(json["data"]["category"], "employee");
    assert_eq!(json["message"], "Employee report added successfully");
    assert!(app.upload_dir.join("employee_aadhar").is_dir());

    form["category"] = json!("student");
    let (status, _) = app.post("/api/add-teacher-emp-report", form).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, json) = app
        .get("/api/reports?action=getStaffReports&staffType=employee")
        .await;
    assert_eq!(status, StatusCode::OK);
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["category"], "employee");
    assert!(rows[0]["aadharPhoto"].as_str().unwrap().ends_with(".png"));
}

#[tokio::test]
async fn test_listing_pagination() {
    let app = TestApp::new();
    let doctor = app.doctor("a@x.com", "9876543210").await;
    for mobile in ["9000000001", "9000000002", "9000000003"] {
        let (status, _) = app.post("/api/add-child-report", child_form(doctor, mobile)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, json) = app.get("/api/reports?action=getReports&page=2&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["pagination"]["totalRecords"], 3);
    assert_eq!(json["pagination"]["totalPages"], 2);
    assert_eq!(json["pagination"]["currentPage"], 2);
    assert_eq!(json["pagination"]["recordsPerPage"], 2);

    let (status, json) = app
        .get("/api/reports?page=9223372036854775807&limit=100")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
    assert_eq!(json["pagination"]["totalRecords"], 3);

    let (_, json) = app.get("/api/reports?search=rampur&limit=500").await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
    assert_eq!(json["pagination"]["recordsPerPage"], 100);

    let (_, json) = app
        .get(&format!("/api/doctor?action=get_children_list&doctor_id={}", doctor))
        .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
    assert_eq!(json["pagination"]["recordsPerPage"], 50);
}

#[tokio::test]
async fn test_report_details() {
    let app = TestApp::new();
    let doctor = app.doctor("a@x.com", "9876543210").await;
    let (_, created) = app.post("/api/add-child-report", child_form(doctor, "9000000001")).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, json) = app
        .get(&format!("/api/reports?action=getReportDetails&id={}", id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["fatherName"], "Ramesh");
    assert_eq!(json["data"]["doctorInfo"]["email"], "a@x.com");

    let (status, _) = app.get("/api/reports?action=getReportDetails&id=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = app.get("/api/reports?action=getReportDetails&id=4040").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Child report not found");
}

#[tokio::test]
async fn test_empty_dashboard_has_zero_percentages() {
    let app = TestApp::new();

    let (status, json) = app.get("/api/admin-dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["totalScreenings"], 0);
    assert_eq!(json["data"]["healthyPercentage"], 0.0);
    assert_eq!(json["data"]["suspiciousPercentage"], 0.0);
}

#[tokio::test]
async fn test_dashboard_percentages_stay_within_bounds() {
    let app = TestApp::new();
    let doctor = app.doctor("a@x.com", "9876543210").await;
    app.post("/api/add-child-report", child_form(doctor, "9000000001")).await;
    let mut clear = child_form(doctor, "9000000002");
    clear["heartStatus"] = json!("संदेह नहीं");
    app.post("/api/add-child-report", clear).await;
    let mut third = child_form(doctor, "9000000003");
    third["heartStatus"] = json!("संदेह नहीं");
    app.post("/api/add-child-report", third).await;

    let (_, json) = app.get("/api/admin-dashboard").await;
    let healthy = json["data"]["healthyPercentage"].as_f64().unwrap();
    let suspicious = json["data"]["suspiciousPercentage"].as_f64().unwrap();
    assert_eq!(json["data"]["totalScreenings"], 3);
    assert_eq!(suspicious, 33.33);
    assert!(healthy + suspicious <= 100.0);
    assert_eq!(json["data"]["activeDoctors"], 1);
}

#[tokio::test]
async fn test_delete_doctor_with_screenings_conflicts() {
    let app = TestApp::new();
    let busy = app.doctor("a@x.com", "9876543210").await;
    let idle = app.doctor("b@x.com", "9876543211").await;
    app.post("/api/add-child-report", child_form(busy, "9000000001")).await;

    let (status, json) = app
        .send(
            Method::DELETE,
            &format!("/api/doctor-management?action=delete&id={}", busy),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["message"].as_str().unwrap().contains("1 screening records"));

    let (status, json) = app
        .send(
            Method::DELETE,
            &format!("/api/doctor-management?action=delete&id={}", idle),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["doctorId"], idle);

    let (status, _) = app
        .send(Method::DELETE, "/api/doctor-management?action=delete&id=0", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_doctor() {
    let app = TestApp::new();
    let id = app.doctor("a@x.com", "9876543210").await;
    app.doctor("b@x.com", "9876543211").await;

    let (status, json) = app
        .send(
            Method::PUT,
            "/api/doctor-management?action=update",
            Some(json!({"id": id, "experience": 12, "hospitalname": "AIIMS"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["experience"], 12);
    assert_eq!(json["data"]["hospitalname"], "AIIMS");

    let (status, json) = app
        .send(
            Method::PUT,
            "/api/doctor-management?action=update",
            Some(json!({"id": id, "email": "b@x.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["message"], "Email is already used by another doctor");

    let (status, json) = app
        .send(
            Method::PUT,
            "/api/doctor-management?action=update",
            Some(json!({"id": id})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "No fields to update");
}

#[tokio::test]
async fn test_doctor_management_views() {
    let app = TestApp::new();
    let id = app.doctor("a@x.com", "9876543210").await;
    app.post("/api/add-child-report", child_form(id, "9000000001")).await;

    let (_, json) = app.get("/api/doctor-management").await;
    assert_eq!(json["data"][0]["totalScreenings"], 1);
    assert_eq!(json["data"][0]["status"], "सक्रिय");

    let (_, json) = app
        .get("/api/doctor-management?action=search&q=district&hospital_type=Government")
        .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let (status, json) = app
        .get(&format!("/api/doctor-management?action=detail&id={}", id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["recentScreenings"].as_array().unwrap().len(), 1);

    let (status, json) = app.get("/api/doctor-management?action=stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["totalDoctors"], 1);
    assert_eq!(json["data"]["activeDoctors"], 1);
}

#[tokio::test]
async fn test_doctor_portal() {
    let app = TestApp::new();
    let id = app.doctor("a@x.com", "9876543210").await;

    let mut form = child_form(0, "9000000001");
    form.as_object_mut().unwrap().remove("dr_id");
    let (status, json) = app
        .post(&format!("/api/doctor?action=add_child_report&doctor_id={}", id), form)
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);

    let (status, json) = app
        .get(&format!("/api/doctor?action=get_doctor_stats&doctor_id={}", id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["totalChildrenScreened"], 1);
    assert_eq!(json["data"]["positiveCases"], 1);

    let (status, json) = app.get("/api/doctor?action=get_doctor_profile&doctor_id=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid doctor ID");

    let (status, json) = app.get("/api/doctor?action=unknown").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid action specified");

    let (status, json) = app.get("/api/doctor?action=test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "API is working correctly");

    let (status, json) = app.get(&format!("/api/doctor-profile?doctor_id={}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["profile"]["email"], "a@x.com");
    assert_eq!(json["data"]["statistics"]["totalChildrenScreened"], 1);

    let (status, _) = app.get("/api/doctor-profile?doctor_id=404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_and_action() {
    let app = TestApp::new();

    let (status, json) = app.get("/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);

    let (status, json) = app.get("/api/reports?action=dropTables").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid action specified");
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/add-doctor")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    assert_eq!(response.headers()[header::ACCESS_CONTROL_MAX_AGE], "86400");
}

#[tokio::test]
async fn test_health_and_docs() {
    let app = TestApp::new();

    let (status, json) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["components"]["database"]["status"], "ok");

    let (status, json) = app.get("/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["info"]["title"], "Dhadkan API");
}
