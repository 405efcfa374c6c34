//! `CREATE CONNECTION ... TO SSH TUNNEL`

use super::{ConnectionOption, ConnectionOptions, OptionList, OptionValue, finish_create};
use crate::ddl::CreateStatement;
use crate::object::MaterializeObject;
use crate::quote::quote_string;
use serde::{Deserialize, Serialize};

fn default_port() -> i64 {
    22
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshTunnelConfig {
    pub host: String,
    pub user: String,
    #[serde(default = "default_port")]
    pub port: i64,
    #[serde(default = "default_true")]
    pub validate: bool,
}

impl CreateStatement for SshTunnelConfig {
    fn create_statement(&self, object: &MaterializeObject) -> String {
        let sql = format!(
            "CREATE CONNECTION {} TO SSH TUNNEL (HOST {}, USER {}, PORT {})",
            object.qualified_name(),
            quote_string(&self.host),
            quote_string(&self.user),
            self.port
        );
        finish_create(sql, self.validate)
    }
}

impl ConnectionOptions for SshTunnelConfig {
    fn options(&self) -> OptionList {
        vec![
            (ConnectionOption::Host, Some(OptionValue::Text(self.host.clone()))),
            (ConnectionOption::User, Some(OptionValue::Text(self.user.clone()))),
            (ConnectionOption::Port, Some(OptionValue::Int(self.port))),
        ]
    }

    fn validate(&self) -> bool {
        self.validate
    }
}
