//! Form bodies, keyed by the field names the pages submit.
//!
//! Every field is optional so a missing input becomes a validation notice
//! instead of a rejected request.

use serde::Deserialize;

use clinicdesk_core::models::{Medication, PrescriptionRequest};
use clinicdesk_core::{Client, ClientFilter, SoapNotes};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub vat: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub zip: Option<String>,
}

impl SearchForm {
    pub fn into_filter(self) -> ClientFilter {
        ClientFilter::from_inputs(self.vat, self.name, self.city, self.street, self.zip)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewClientForm {
    #[serde(rename = "VAT")]
    pub vat: Option<String>,
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub gender: Option<String>,
}

impl NewClientForm {
    pub fn into_client(self) -> Client {
        Client {
            vat: self.vat.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            birth_date: self.birth_date.unwrap_or_default(),
            street: self.street.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            zip: self.zip.unwrap_or_default(),
            gender: self.gender.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppointmentForm {
    pub date: Option<String>,
    pub time: Option<String>,
    pub doctorvat: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AvailabilityForm {
    pub date: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SoapForm {
    pub soap_s: Option<String>,
    pub soap_o: Option<String>,
    pub soap_a: Option<String>,
    pub soap_p: Option<String>,
}

impl SoapForm {
    pub fn into_notes(self) -> SoapNotes {
        SoapNotes {
            subjective: self.soap_s.unwrap_or_default(),
            objective: self.soap_o.unwrap_or_default(),
            assessment: self.soap_a.unwrap_or_default(),
            plan: self.soap_p.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NurseForm {
    pub input_nurse_vat: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DiagnosticForm {
    pub input_diagnostic: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PrescriptionForm {
    pub med_name: Option<String>,
    pub med_lab: Option<String>,
    pub dosage: Option<String>,
    pub prescription_desc: Option<String>,
}

impl PrescriptionForm {
    pub fn into_request(self) -> PrescriptionRequest {
        let trimmed = |v: Option<String>| v.unwrap_or_default().trim().to_string();
        PrescriptionRequest {
            medication: Medication {
                name: trimmed(self.med_name),
                lab: trimmed(self.med_lab),
            },
            dosage: trimmed(self.dosage),
            description: trimmed(self.prescription_desc),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DashboardForm {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
