use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::hotels::repo_types::{Hotel, HotelChanges, NewHotel};

const MAX_NAME_LEN: usize = 50;
const POSTAL_CODE_LEN: usize = 5;

#[derive(Debug, Deserialize)]
pub struct CreateHotelRequest {
    pub name: String,
    pub address: String,
    pub district: String,
    pub province: String,
    pub postalcode: String,
    #[serde(default)]
    pub tel: Option<String>,
    pub region: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateHotelRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub postalcode: Option<String>,
    pub tel: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HotelResponse {
    pub id: String,
    pub name: String,
    pub address: String,
    pub district: String,
    pub province: String,
    pub postalcode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
    pub region: String,
}

impl From<Hotel> for HotelResponse {
    fn from(h: Hotel) -> Self {
        Self {
            id: h.id.to_hex(),
            name: h.name,
            address: h.address,
            district: h.district,
            province: h.province,
            postalcode: h.postal_code,
            tel: h.tel,
            region: h.region,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteHotelResponse {
    pub success: bool,
    pub deleted_appointments: u64,
}

fn check_name(name: &str) -> Result<(), AppError> {
    let len = name.trim().chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        return Err(AppError::Validation(format!(
            "name must be 1 to {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

fn check_postal_code(code: &str) -> Result<(), AppError> {
    if code.chars().count() != POSTAL_CODE_LEN {
        return Err(AppError::Validation(format!(
            "postalcode must be {} characters",
            POSTAL_CODE_LEN
        )));
    }
    Ok(())
}

fn check_required(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

impl CreateHotelRequest {
    pub fn validate(self) -> Result<NewHotel, AppError> {
        check_name(&self.name)?;
        check_required("address", &self.address)?;
        check_required("district", &self.district)?;
        check_required("province", &self.province)?;
        check_postal_code(&self.postalcode)?;
        check_required("region", &self.region)?;
        Ok(NewHotel {
            name: self.name,
            address: self.address,
            district: self.district,
            province: self.province,
            postal_code: self.postalcode,
            tel: self.tel.filter(|t| !t.is_empty()),
            region: self.region,
        })
    }
}

impl UpdateHotelRequest {
    pub fn validate(self) -> Result<HotelChanges, AppError> {
        if let Some(name) = &self.name {
            check_name(name)?;
        }
        if let Some(v) = &self.address {
            check_required("address", v)?;
        }
        if let Some(v) = &self.district {
            check_required("district", v)?;
        }
        if let Some(v) = &self.province {
            check_required("province", v)?;
        }
        if let Some(code) = &self.postalcode {
            check_postal_code(code)?;
        }
        if let Some(v) = &self.region {
            check_required("region", v)?;
        }
        Ok(HotelChanges {
            name: self.name,
            address: self.address,
            district: self.district,
            province: self.province,
            postal_code: self.postalcode,
            tel: self.tel,
            region: self.region,
        })
    }
}
