//! Tables fed by a webhook endpoint.

use super::sql_object::SqlKind;
use declarative::ResourceData;
use mzsql::webhook::{
    CheckField, CheckOption, IncludeHeader, TableWebhookConfig, scan_table_columns,
    scan_table_webhook,
};
use mzsql::{DdlBuilder, Executor, ObjectParams, ObjectType};

const IMMUTABLE: &[&str] = &[
    "schema_name",
    "database_name",
    "body_format",
    "include_header",
    "include_headers",
    "check_options",
    "check_expression",
];

fn describe_header(header: &IncludeHeader) -> String {
    let mut text = header.header.clone();
    if let Some(alias) = &header.alias {
        text.push_str(&format!(" AS {alias}"));
    }
    if header.bytes {
        text.push_str(" BYTES");
    }
    text
}

fn describe_check(option: &CheckOption) -> String {
    let mut text = match &option.field {
        CheckField::Body => "BODY".to_string(),
        CheckField::Headers => "HEADERS".to_string(),
        CheckField::Secret(secret) => secret.secret_sql(),
    };
    if let Some(alias) = &option.alias {
        text.push_str(&format!(" AS {alias}"));
    }
    if option.bytes {
        text.push_str(" BYTES");
    }
    text
}

impl SqlKind for TableWebhookConfig {
    const RESOURCE_TYPE: &'static str = "table_webhook";
    const OBJECT_TYPE: ObjectType = ObjectType::Table;

    fn immutable_keys() -> &'static [&'static str] {
        IMMUTABLE
    }

    fn check(&self) -> mzsql::Result<()> {
        TableWebhookConfig::check(self)
    }

    fn create(&self, builder: &DdlBuilder<'_>) -> mzsql::Result<()> {
        builder.create(self)
    }

    fn desired(&self, data: &mut ResourceData) {
        data.set("body_format", self.body_format.to_string());
        if !self.include_header.is_empty() {
            let headers: Vec<String> = self.include_header.iter().map(describe_header).collect();
            data.set("include_header", headers);
        }
        if let Some(headers) = &self.include_headers {
            let mut filters = headers.only.clone();
            filters.extend(headers.not.iter().map(|h| format!("NOT {h}")));
            if filters.is_empty() && headers.all {
                filters.push("*".to_string());
            }
            data.set("include_headers", filters);
        }
        if !self.check_options.is_empty() {
            let options: Vec<String> = self.check_options.iter().map(describe_check).collect();
            data.set("check_options", options);
        }
        data.set_opt("check_expression", self.check_expression.clone());
    }

    fn scan(&self, exec: &dyn Executor, id: &str, data: &mut ResourceData) -> mzsql::Result<ObjectParams> {
        let params = scan_table_webhook(exec, id)?;
        data.set_opt("url", params.url);

        let columns: Vec<String> = scan_table_columns(exec, id)?
            .into_iter()
            .map(|c| {
                let null = if c.nullable { "" } else { " NOT NULL" };
                format!("{} {}{null}", c.name, c.column_type)
            })
            .collect();
        data.set("columns", columns);
        Ok(params.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::SqlObjectSpec;
    use crate::providers::Providers;
    use crate::resource::sql_object::SqlResource;
    use crate::resource::testing;
    use declarative::{Action, Resource, plan_action};
    use mzsql::Row;
    use mzsql::mock::MockExecutor;
    use mzsql::webhook::BodyFormat;

    fn spec(config: TableWebhookConfig) -> SqlObjectSpec<TableWebhookConfig> {
        SqlObjectSpec {
            name: "events".into(),
            schema_name: None,
            database_name: None,
            ownership_role: None,
            comment: Some("segment events".into()),
            config,
        }
    }

    fn table_row() -> Row {
        Row::new()
            .with("id", "u9")
            .with("name", "events")
            .with("schema_name", "public")
            .with("database_name", "materialize")
            .with("owner_name", "mz_system")
            .with("comment", "segment events")
            .with("url", "https://example.materialize.cloud/api/webhook/materialize/public/events")
    }

    fn column(name: &str, column_type: &str, nullable: bool) -> Row {
        Row::new()
            .with("name", name)
            .with("type", column_type)
            .with("nullable", nullable)
    }

    #[test]
    fn test_create_records_url_and_columns() {
        let exec = MockExecutor::new()
            .on_query("FROM mz_columns", vec![
                column("body", "jsonb", false),
                column("x_signature", "text", true),
            ])
            .on_query("mz_tables", vec![table_row()]);
        let providers = testing::sql(&exec);

        let mut config = TableWebhookConfig::new(BodyFormat::Json);
        config.include_header.push(IncludeHeader {
            header: "x-signature".into(),
            alias: Some("x_signature".into()),
            bytes: false,
        });

        let mut data = ResourceData::new();
        SqlResource::new(spec(config))
            .create(&providers, &mut data)
            .unwrap();

        assert_eq!(
            exec.statements(),
            vec![
                r#"CREATE TABLE "materialize"."public"."events" FROM WEBHOOK BODY FORMAT JSON INCLUDE HEADER 'x-signature' AS "x_signature";"#,
                r#"COMMENT ON TABLE "materialize"."public"."events" IS 'segment events';"#,
            ]
        );
        assert!(data.get_str("url").unwrap().ends_with("/public/events"));
        assert_eq!(
            data.get_list("columns"),
            vec!["body jsonb NOT NULL", "x_signature text"]
        );
        assert_eq!(data.get_list("include_header"), vec!["x-signature AS x_signature"]);
        assert_eq!(data.get_str("comment"), Some("segment events"));
    }

    #[test]
    fn test_body_format_change_forces_replace() {
        let resource = SqlResource::new(spec(TableWebhookConfig::new(BodyFormat::Json)));
        let mut data = resource.desired();
        data.set_id("aws/us-east-1:u9");
        data.set("body_format", "TEXT");
        assert!(matches!(
            plan_action::<Providers>(&resource, Some(&data)),
            Action::Replace { .. }
        ));
    }

    #[test]
    fn test_check_options_without_expression_are_rejected() {
        let mut config = TableWebhookConfig::new(BodyFormat::Bytes);
        config.check_options.push(CheckOption {
            field: CheckField::Body,
            alias: None,
            bytes: false,
        });
        assert!(SqlKind::check(&config).is_err());

        config.check_expression = Some("length(body) > 0".into());
        assert!(SqlKind::check(&config).is_ok());
        let mut data = ResourceData::new();
        config.desired(&mut data);
        assert_eq!(data.get_list("check_options"), vec!["BODY"]);
    }
}
