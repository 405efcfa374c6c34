//! `CREATE CONNECTION ... TO AWS PRIVATELINK`

use super::{ConnectionOption, ConnectionOptions, OptionList, OptionValue};
use crate::ddl::CreateStatement;
use crate::object::MaterializeObject;
use crate::quote::quote_string;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsPrivatelinkConfig {
    pub service_name: String,
    #[serde(default)]
    pub availability_zones: Vec<String>,
}

impl CreateStatement for AwsPrivatelinkConfig {
    fn create_statement(&self, object: &MaterializeObject) -> String {
        let zones = self
            .availability_zones
            .iter()
            .map(|zone| quote_string(zone))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "CREATE CONNECTION {} TO AWS PRIVATELINK (SERVICE NAME {}, AVAILABILITY ZONES ({zones}));",
            object.qualified_name(),
            quote_string(&self.service_name),
        )
    }
}

impl ConnectionOptions for AwsPrivatelinkConfig {
    fn options(&self) -> OptionList {
        vec![
            (
                ConnectionOption::ServiceName,
                Some(OptionValue::Text(self.service_name.clone())),
            ),
            (
                ConnectionOption::AvailabilityZones,
                Some(OptionValue::TextList(self.availability_zones.clone())),
            ),
        ]
    }
}
