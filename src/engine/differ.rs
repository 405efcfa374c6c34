//! Plan display

use colored::{ColoredString, Colorize};
use declarative::{Action, Plan, PlannedChange};
use std::collections::BTreeMap;

use crate::providers::Providers;

fn type_heading(resource_type: &str) -> &str {
    match resource_type {
        "connection_ssh_tunnel" => "Connections (SSH tunnel)",
        "connection_aws_privatelink" => "Connections (AWS PrivateLink)",
        "connection_aws" => "Connections (AWS)",
        "connection_kafka" => "Connections (Kafka)",
        "connection_postgres" => "Connections (Postgres)",
        "connection_mysql" => "Connections (MySQL)",
        "connection_confluent_schema_registry" => "Connections (schema registry)",
        "secret" => "Secrets",
        "type" => "Types",
        "table_webhook" => "Webhook tables",
        "user" => "Users",
        "app_password" => "App passwords",
        "scim_group" => "SCIM groups",
        "scim_group_roles" => "SCIM group roles",
        "scim_group_users" => "SCIM group users",
        "scim_config" => "SCIM configs",
        "sso_config" => "SSO configs",
        "sso_domain" => "SSO domains",
        "sso_group_mapping" => "SSO group mappings",
        "sso_default_roles" => "SSO default roles",
        _ => resource_type,
    }
}

fn colored_symbol(action: &Action) -> ColoredString {
    match action {
        Action::Create => action.symbol().green(),
        Action::Update { .. } => action.symbol().yellow(),
        Action::Replace { .. } => action.symbol().magenta(),
        Action::Delete => action.symbol().red(),
        Action::NoChange => action.symbol().dimmed(),
    }
}

/// The trailing detail for one change: which keys move, and why a
/// replace is needed.
fn change_detail(action: &Action) -> String {
    match action {
        Action::Update { changes } => format!("({})", changes.join(", ")),
        Action::Replace { changes } => format!("({}) forces replacement", changes.join(", ")),
        Action::Delete => "(will remove)".to_string(),
        Action::Create | Action::NoChange => String::new(),
    }
}

/// Display the pending changes of a plan, grouped by kind
pub fn display_plan(plan: &Plan<Providers>) {
    let pending: Vec<&PlannedChange<Providers>> =
        plan.changes.iter().filter(|c| c.action.is_change()).collect();

    if pending.is_empty() {
        println!();
        println!("  {} No changes needed", "✓".green());
        return;
    }

    let mut by_type: BTreeMap<&str, Vec<&PlannedChange<Providers>>> = BTreeMap::new();
    for &change in &pending {
        by_type
            .entry(change.resource.resource_type())
            .or_default()
            .push(change);
    }

    println!();
    println!(
        "┌─ {} ─────────────────────────────────────────┐",
        "Plan".bold()
    );
    println!("│");

    for (resource_type, changes) in &by_type {
        println!("│ {}", type_heading(resource_type).bold());
        for change in changes {
            println!(
                "│   {:<3} {:<24} {} {}",
                colored_symbol(&change.action),
                change.label,
                change.resource.description(),
                change_detail(&change.action).dimmed()
            );
        }
        println!("│");
    }

    let summary = plan.summary();
    println!("├─────────────────────────────────────────────────────┤");
    println!(
        "│ Summary: {} to add, {} to change, {} to replace, {} to destroy",
        summary.additions.to_string().green(),
        summary.modifications.to_string().yellow(),
        summary.replacements.to_string().magenta(),
        summary.removals.to_string().red()
    );
    println!("└─────────────────────────────────────────────────────┘");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_detail() {
        assert_eq!(
            change_detail(&Action::Update {
                changes: vec!["comment".into(), "ownership_role".into()]
            }),
            "(comment, ownership_role)"
        );
        assert_eq!(
            change_detail(&Action::Replace {
                changes: vec!["email".into()]
            }),
            "(email) forces replacement"
        );
        assert!(change_detail(&Action::Create).is_empty());
    }

    #[test]
    fn test_type_heading_falls_back_to_kind() {
        assert_eq!(type_heading("sso_domain"), "SSO domains");
        assert_eq!(type_heading("cluster"), "cluster");
    }
}
