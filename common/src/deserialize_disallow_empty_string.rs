use serde::{Deserialize, Deserializer, de::Error};

pub fn disallow_empty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let input_string: Option<String> = Option::deserialize(deserializer)?;

    let Some(value) = input_string else {
        return Err(Error::custom("field is not a string"));
    };

    if value.trim().is_empty() {
        return Err(Error::custom("field is empty"));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::disallow_empty_string;

    #[derive(Deserialize)]
    struct Payload {
        #[serde(deserialize_with = "disallow_empty_string")]
        password: String,
    }

    #[test]
    fn rejects_blank_and_null() {
        assert!(serde_json::from_str::<Payload>(r#"{"password": ""}"#).is_err());
        assert!(serde_json::from_str::<Payload>(r#"{"password": "   "}"#).is_err());
        assert!(serde_json::from_str::<Payload>(r#"{"password": null}"#).is_err());
    }

    #[test]
    fn keeps_value_untouched() {
        let payload = serde_json::from_str::<Payload>(r#"{"password": " hunter2 "}"#).unwrap();
        assert_eq!(payload.password, " hunter2 ");
    }
}
