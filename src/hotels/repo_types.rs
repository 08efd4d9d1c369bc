use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Hotel document in the `hotels` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotel {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub address: String,
    pub district: String,
    pub province: String,
    #[serde(rename = "postalcode")]
    pub postal_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
    pub region: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHotel {
    pub name: String,
    pub address: String,
    pub district: String,
    pub province: String,
    #[serde(rename = "postalcode")]
    pub postal_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
    pub region: String,
}

impl NewHotel {
    pub fn with_id(self, id: ObjectId) -> Hotel {
        Hotel {
            id,
            name: self.name,
            address: self.address,
            district: self.district,
            province: self.province,
            postal_code: self.postal_code,
            tel: self.tel,
            region: self.region,
        }
    }
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct HotelChanges {
    pub name: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub tel: Option<String>,
    pub region: Option<String>,
}

impl HotelChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.district.is_none()
            && self.province.is_none()
            && self.postal_code.is_none()
            && self.tel.is_none()
            && self.region.is_none()
    }

    /// Fields to `$set`, keyed by their stored names.
    pub fn to_set_document(&self) -> bson::Document {
        let mut set = bson::Document::new();
        let fields = [
            ("name", &self.name),
            ("address", &self.address),
            ("district", &self.district),
            ("province", &self.province),
            ("postalcode", &self.postal_code),
            ("tel", &self.tel),
            ("region", &self.region),
        ];
        for (key, value) in fields {
            if let Some(v) = value {
                set.insert(key, v.clone());
            }
        }
        set
    }

    pub fn apply(self, hotel: &mut Hotel) {
        if let Some(v) = self.name {
            hotel.name = v;
        }
        if let Some(v) = self.address {
            hotel.address = v;
        }
        if let Some(v) = self.district {
            hotel.district = v;
        }
        if let Some(v) = self.province {
            hotel.province = v;
        }
        if let Some(v) = self.postal_code {
            hotel.postal_code = v;
        }
        if let Some(v) = self.tel {
            hotel.tel = Some(v);
        }
        if let Some(v) = self.region {
            hotel.region = v;
        }
    }
}
