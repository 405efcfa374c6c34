//! `CREATE CONNECTION ... TO AWS`

use super::{ConnectionOption, ConnectionOptions, OptionList, OptionValue, finish_create, opt};
use crate::ddl::CreateStatement;
use crate::object::{IdentifierSchema, MaterializeObject, ValueSecret};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Credentials and endpoint for an AWS connection.
///
/// Either static credentials (access key id + secret access key, optional
/// session token) or an assumed role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub aws_region: Option<String>,
    #[serde(default)]
    pub access_key_id: Option<ValueSecret>,
    #[serde(default)]
    pub secret_access_key: Option<IdentifierSchema>,
    #[serde(default)]
    pub session_token: Option<ValueSecret>,
    #[serde(default)]
    pub assume_role_arn: Option<String>,
    #[serde(default)]
    pub assume_role_session_name: Option<String>,
    #[serde(default = "default_true")]
    pub validate: bool,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            aws_region: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            assume_role_arn: None,
            assume_role_session_name: None,
            validate: true,
        }
    }
}

impl CreateStatement for AwsConfig {
    fn create_statement(&self, object: &MaterializeObject) -> String {
        let clauses: Vec<String> = self
            .options()
            .into_iter()
            .filter_map(|(option, value)| value.map(|v| format!("{option} = {}", v.to_sql())))
            .collect();
        let sql = format!(
            "CREATE CONNECTION {} TO AWS ({})",
            object.qualified_name(),
            clauses.join(", ")
        );
        finish_create(sql, self.validate)
    }
}

impl ConnectionOptions for AwsConfig {
    fn options(&self) -> OptionList {
        let mut list = OptionList::new();
        opt(&mut list, ConnectionOption::Endpoint, self.endpoint.clone(), OptionValue::Text);
        opt(&mut list, ConnectionOption::Region, self.aws_region.clone(), OptionValue::Text);
        opt(&mut list, ConnectionOption::AccessKeyId, self.access_key_id.clone(), OptionValue::Value);
        opt(
            &mut list,
            ConnectionOption::SecretAccessKey,
            self.secret_access_key.clone(),
            OptionValue::Secret,
        );
        opt(&mut list, ConnectionOption::SessionToken, self.session_token.clone(), OptionValue::Value);
        opt(&mut list, ConnectionOption::AssumeRoleArn, self.assume_role_arn.clone(), OptionValue::Text);
        opt(
            &mut list,
            ConnectionOption::AssumeRoleSessionName,
            self.assume_role_session_name.clone(),
            OptionValue::Text,
        );
        list
    }

    fn validate(&self) -> bool {
        self.validate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectType;

    fn object() -> MaterializeObject {
        MaterializeObject::new(ObjectType::Connection, "aws_conn")
            .with_schema("schema")
            .with_database("database")
    }

    #[test]
    fn test_create_aws_static_credentials() {
        let config = AwsConfig {
            endpoint: Some("http://localhost:4566".into()),
            aws_region: Some("us-east-1".into()),
            access_key_id: Some(ValueSecret::text("AKIA")),
            secret_access_key: Some(IdentifierSchema::new("aws_secret")),
            session_token: Some(ValueSecret::secret(IdentifierSchema::new("token"))),
            validate: true,
            ..Default::default()
        };
        assert_eq!(
            config.create_statement(&object()),
            r#"CREATE CONNECTION "database"."schema"."aws_conn" TO AWS (ENDPOINT = 'http://localhost:4566', REGION = 'us-east-1', ACCESS KEY ID = 'AKIA', SECRET ACCESS KEY = SECRET "materialize"."public"."aws_secret", SESSION TOKEN = SECRET "materialize"."public"."token");"#
        );
    }

    #[test]
    fn test_create_aws_assume_role() {
        let config = AwsConfig {
            assume_role_arn: Some("arn:aws:iam::123:role/mz".into()),
            assume_role_session_name: Some("s".into()),
            validate: false,
            ..Default::default()
        };
        assert_eq!(
            config.create_statement(&object()),
            r#"CREATE CONNECTION "database"."schema"."aws_conn" TO AWS (ASSUME ROLE ARN = 'arn:aws:iam::123:role/mz', ASSUME ROLE SESSION NAME = 's') WITH (VALIDATE = false);"#
        );
    }

    #[test]
    fn test_default_validates() {
        let config = AwsConfig {
            aws_region: Some("us-east-1".into()),
            ..Default::default()
        };
        assert!(config.validate);
        assert_eq!(
            config.create_statement(&object()),
            r#"CREATE CONNECTION "database"."schema"."aws_conn" TO AWS (REGION = 'us-east-1');"#
        );
    }
}
