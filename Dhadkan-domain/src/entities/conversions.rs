//! Conversions between data-layer records and domain entities.
//! Display formatting of timestamps happens here and nowhere else.

use dhadkan_data::models::{
    ChildDetailRow, DoctorActivityRow, DoctorBrief, DoctorRecord, NewScreening,
    RecentScreeningRow, ScreeningRow, ScreeningSummary,
};

use super::doctor::{
    Doctor, DoctorDetail, DoctorListing, DoctorSummary, RecentScreening, STATUS_ACTIVE,
    STATUS_INACTIVE,
};
use super::screening::{ChildReport, DoctorInfo, ScreeningEntry, ValidScreening};
use super::values::{Category, HeartStatus};
use crate::clock::{display_date, display_datetime, display_last, NEVER};

/// Specialisation shown on every doctor card
const DEFAULT_SPECIALIZATION: &str = "बाल हृदय विशेषज्ञ";

/// Hospital shown when a doctor has none on file
const UNKNOWN_HOSPITAL: &str = "अज्ञात";

pub fn convert_to_domain_doctor(record: DoctorRecord) -> Doctor {
    Doctor {
        id: record.id,
        doctor_name: record.doctor_name,
        hospital_type: record.hospital_type,
        hospital_name: record.hospital_name,
        phone_no: record.phone_no,
        experience: record.experience,
        email: record.email,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

pub fn convert_to_domain_listing(row: DoctorActivityRow) -> DoctorListing {
    let status = if row.active { STATUS_ACTIVE } else { STATUS_INACTIVE };
    let doctor = convert_to_domain_doctor(row.doctor);

    DoctorListing {
        name: doctor.doctor_name.clone(),
        specialization: DEFAULT_SPECIALIZATION.to_string(),
        hospital: doctor
            .hospital_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_HOSPITAL.to_string()),
        phone: doctor.phone_no.clone(),
        joining_date: display_date(&doctor.created_at),
        total_screenings: row.summary.total,
        healthy_found: row.summary.healthy,
        suspicious_found: row.summary.suspicious,
        last_screening: display_last(row.summary.last_screening.as_deref()),
        status: status.to_string(),
        doctor,
    }
}

pub fn convert_to_domain_summary(brief: DoctorBrief) -> DoctorSummary {
    DoctorSummary {
        id: brief.id,
        doctor_name: brief.doctor_name,
        hospital_name: brief.hospital_name,
        email: brief.email,
        phone_no: brief.phone_no,
    }
}

pub fn convert_to_domain_detail(
    record: DoctorRecord,
    summary: ScreeningSummary,
    recent: Vec<RecentScreeningRow>,
) -> DoctorDetail {
    DoctorDetail {
        doctor: convert_to_domain_doctor(record),
        total_screenings: summary.total,
        healthy_found: summary.healthy,
        suspicious_found: summary.suspicious,
        last_screening: summary
            .last_screening
            .as_deref()
            .map(display_datetime)
            .unwrap_or_else(|| NEVER.to_string()),
        recent_screenings: recent
            .into_iter()
            .map(|row| RecentScreening {
                name: row.name,
                age: row.age,
                gender: row.gender,
                heart_status: row.heart_status,
                created_at: display_date(&row.created_at),
            })
            .collect(),
    }
}

pub fn convert_to_domain_entry(row: ScreeningRow) -> ScreeningEntry {
    let suspicious = HeartStatus::parse(&row.heart_status) == Some(HeartStatus::Suspicious);
    ScreeningEntry {
        id: row.id,
        doctor_id: row.doctor_id,
        name: row.name,
        age: row.age,
        gender: row.gender,
        father_name: row.father_name,
        mobile_no: row.mobile_no,
        school_name: row.school_name,
        have_aadhar: row.have_aadhar,
        have_shramik: row.have_shramik,
        aadhar_photo: row.aadhar_photo,
        shramik_photo: row.shramik_photo,
        notes: row.notes,
        screening_date: display_date(&row.created_at),
        category: Category::from(row.table),
        doctor_name: row.doctor_name,
        hospital_name: row.hospital_name,
        hospital_type: row.hospital_type,
        disease_found: suspicious,
        health_status: if suspicious { "असामान्य" } else { "स्वस्थ" }.to_string(),
        heart_status: row.heart_status,
    }
}

pub fn convert_to_domain_child_report(detail: ChildDetailRow) -> ChildReport {
    let row = detail.screening;
    ChildReport {
        id: row.id,
        doctor_id: row.doctor_id,
        name: row.name,
        age: row.age,
        gender: row.gender,
        father_name: row.father_name,
        mobile_no: row.mobile_no,
        school_name: row.school_name,
        have_aadhar: row.have_aadhar,
        have_shramik: row.have_shramik,
        aadhar_photo: row.aadhar_photo,
        shramik_photo: row.shramik_photo,
        heart_status: row.heart_status,
        notes: row.notes,
        screening_date: display_datetime(&row.created_at),
        doctor_info: DoctorInfo {
            name: row.doctor_name,
            hospital: row.hospital_name,
            hospital_type: row.hospital_type,
            email: detail.doctor_email,
            phone: detail.doctor_phone,
        },
    }
}

/// Storage row for a validated screening
pub fn convert_to_data_screening(
    screening: &ValidScreening,
    aadhar_photo: Option<String>,
    shramik_photo: Option<String>,
    created_at: String,
) -> NewScreening {
    NewScreening {
        doctor_id: screening.doctor_id,
        name: screening.name.clone(),
        age: screening.age,
        gender: screening.gender.as_str().to_string(),
        father_name: screening.father_name.clone(),
        mobile_no: screening.mobile_no.clone(),
        school_name: screening.school_name.clone(),
        have_aadhar: screening.have_aadhar.as_str().to_string(),
        have_shramik: screening.have_shramik.as_str().to_string(),
        aadhar_photo,
        shramik_photo,
        heart_status: screening.heart_status.as_str().to_string(),
        notes: screening.notes.clone(),
        created_at,
    }
}
