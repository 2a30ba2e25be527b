//! Connection declarations: message brokers, databases and REST APIs.

use serde::Serialize;
use webdsl_syntax::Location;

///
/// Broker
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Broker {
    pub name: String,
    pub kind: BrokerKind,
    pub host: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub vhost: Option<String>,

    #[serde(skip)]
    pub location: Location,
}

///
/// BrokerKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum BrokerKind {
    #[serde(rename = "AMQP")]
    Amqp,
    #[serde(rename = "MQTT")]
    Mqtt,
    Redis,
}

impl BrokerKind {
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "AMQP" => Some(Self::Amqp),
            "MQTT" => Some(Self::Mqtt),
            "Redis" => Some(Self::Redis),
            _ => None,
        }
    }
}

///
/// Database
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    pub name: String,
    pub kind: DatabaseKind,
    pub host: String,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,

    #[serde(skip)]
    pub location: Location,
}

///
/// DatabaseKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum DatabaseKind {
    #[serde(rename = "MongoDB")]
    MongoDb,
    #[serde(rename = "MySQL")]
    MySql,
}

impl DatabaseKind {
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "MongoDB" => Some(Self::MongoDb),
            "MySQL" => Some(Self::MySql),
            _ => None,
        }
    }
}

///
/// RestApi
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestApi {
    pub name: String,
    pub host: String,
    pub port: Option<u16>,
    pub https: bool,
    pub base_path: Option<String>,

    #[serde(skip)]
    pub location: Location,
}

impl RestApi {
    /// `scheme://host[:port][basePath]`
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.https { "https" } else { "http" };
        let port = self.port.map(|port| format!(":{port}")).unwrap_or_default();
        let base_path = self.base_path.as_deref().unwrap_or_default();

        format!("{scheme}://{}{port}{base_path}", self.host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_api_base_url() {
        let mut api = RestApi {
            name: "Weather".into(),
            host: "api.example.com".into(),
            port: None,
            https: true,
            base_path: Some("/v1".into()),
            location: Location {
                path: "root.wdsl".into(),
                line: 1,
                column: 1,
            },
        };
        assert_eq!(api.base_url(), "https://api.example.com/v1");

        api.https = false;
        api.port = Some(8080);
        api.base_path = None;
        assert_eq!(api.base_url(), "http://api.example.com:8080");
    }
}
