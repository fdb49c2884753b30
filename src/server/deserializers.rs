use std::num::IntErrorKind;

use serde::{Deserialize, Deserializer};

// the frontend posts select values as strings, so "3" and 3 are both accepted
#[derive(Deserialize)]
#[serde(untagged)]
enum RawInt {
    Int(i64),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawInt")]
pub struct Stri64(pub i64);

impl TryFrom<RawInt> for Stri64 {
    type Error = String;

    fn try_from(value: RawInt) -> Result<Self, Self::Error> {
        match value {
            RawInt::Int(v) => Ok(Stri64(v)),
            RawInt::Str(s) => match s.trim().parse::<i64>() {
                Ok(v) => Ok(Stri64(v)),
                Err(_) => Err(format!("Wrong value {s}, can not parse to i64")),
            },
        }
    }
}

pub fn first_page() -> i64 {
    1
}

// `?page=abc` falls back to the first page rather than failing the request,
// while out-of-range numbers saturate so they still land past the last page
pub fn deserialize_page<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<String>::deserialize(deserializer)? else {
        return Ok(first_page());
    };
    Ok(match value.trim().parse::<i64>() {
        Ok(page) => page,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => first_page(),
        },
    })
}
