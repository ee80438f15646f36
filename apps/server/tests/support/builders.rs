//! Request payload builders.

use serde_json::{json, Value};
use uuid::Uuid;

pub fn patient_payload(card_number: i64, name: &str) -> Value {
    json!({
        "cardNumber": card_number,
        "firstName": name,
        "age": 30,
        "sex": "male",
        "phone": "0911-000000",
        "town": "Addis Ababa"
    })
}

pub fn patient_with_age(card_number: i64, name: &str, age: u32, sex: &str) -> Value {
    json!({
        "cardNumber": card_number,
        "firstName": name,
        "age": age,
        "sex": sex
    })
}

pub fn appointment_payload(date: &str) -> Value {
    json!({
        "date": date,
        "time": "10:30",
        "reason": "Checkup"
    })
}

pub fn finding_payload(diseases: &[Uuid]) -> Value {
    json!({
        "chiefComplaint": "Toothache",
        "diagnosis": "Pulpitis",
        "treatmentPlan": [
            { "rootCanal": true, "toothNumber": "36" }
        ],
        "diseases": diseases
    })
}

pub fn health_info_payload() -> Value {
    json!({
        "bloodGroup": "O+",
        "bloodPressure": "120/80",
        "heartRate": "72",
        "screening": { "asthma": true }
    })
}

pub fn line_item(service_id: Uuid, name: &str, quantity: u32, price: &str) -> Value {
    json!({
        "serviceId": service_id,
        "serviceName": name,
        "quantity": quantity,
        "price": price
    })
}

pub fn billing_payload(items: Vec<Value>) -> Value {
    json!({ "items": items })
}
