use serde::Deserialize;

use crate::models::record::RawRecord;

/// Envelope of the wind-and-solar endpoint. Anything besides `data` is ignored.
#[derive(Deserialize, Debug)]
pub struct ElexonResponse {
    pub data: Vec<RawRecord>,
}
