use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use clap::Args as ClapArgs;
use tracklink_client::Jira;
use tracklink_core::models::{CustomField, CustomFieldFetchOptions};
use tracklink_core::{Issue, NamedValue, UpdatePayload};

use crate::Command;

/// Field values shared by `edit` and `create`
#[derive(ClapArgs, Debug, Default)]
pub struct FieldArgs {
    #[arg(short, long)]
    pub summary: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,

    #[arg(short, long)]
    pub assignee: Option<String>,

    #[arg(long)]
    pub priority: Option<String>,

    #[arg(long)]
    pub environment: Option<String>,

    /// Due date as YYYY-MM-DD
    #[arg(long)]
    pub due: Option<String>,

    /// Custom field value as id=value, repeatable
    #[arg(short = 'f', long = "field")]
    pub custom: Vec<String>,
}

impl FieldArgs {
    fn apply(&self, issue: &mut Issue, definitions: &[CustomField]) -> Result<()> {
        if let Some(ref summary) = self.summary {
            issue.set_summary(Some(summary.as_str()));
        }
        if let Some(ref description) = self.description {
            issue.set_description(Some(description.as_str()));
        }
        if let Some(ref assignee) = self.assignee {
            issue.set_assignee(Some(assignee.as_str()));
        }
        if let Some(ref priority) = self.priority {
            issue.set_priority(Some(priority.as_str()));
        }
        if let Some(ref environment) = self.environment {
            issue.set_environment(Some(environment.as_str()));
        }
        if let Some(ref due) = self.due {
            issue.set_due_date_str(due)?;
        }

        for (id, values) in parse_custom_fields(&self.custom)? {
            match definitions.iter().find(|d| d.id == id || d.name == id) {
                Some(definition) => issue.set_custom_field_checked(definition, values.as_slice())?,
                None => {
                    tracing::warn!(field = %id, "No definition found, sending unchecked");
                    issue.set_custom_field(id, values)?;
                }
            }
        }

        Ok(())
    }
}

/// Group repeated `id=value` arguments by field id, keeping first-seen order
pub fn parse_custom_fields(args: &[String]) -> Result<Vec<(String, Vec<String>)>> {
    let mut fields: Vec<(String, Vec<String>)> = Vec::new();

    for arg in args {
        let Some((id, value)) = arg.split_once('=') else {
            bail!("Invalid field '{}', expected id=value", arg);
        };
        let id = id.trim();
        if id.is_empty() {
            bail!("Invalid field '{}', missing field id", arg);
        }

        match fields.iter_mut().find(|(existing, _)| existing == id) {
            Some((_, values)) => values.push(value.to_string()),
            None => fields.push((id.to_string(), vec![value.to_string()])),
        }
    }

    Ok(fields)
}

pub async fn run(jira: &Jira, command: Command) -> Result<()> {
    match command {
        Command::Projects => {
            for project in jira.projects().get_projects().await? {
                println!("{:<12} {}", project.key, project.name);
            }
        }
        Command::IssueTypes { project } => {
            let issue_types = match project {
                Some(key) => jira.issue_types().get_issue_types_for_project(&key).await?,
                None => jira.issue_types().get_issue_types().await?,
            };
            for issue_type in issue_types {
                let marker = if issue_type.is_sub_task { " (sub-task)" } else { "" };
                println!("{:<8} {}{}", issue_type.id, issue_type.name, marker);
            }
        }
        Command::Statuses => {
            for status in jira.statuses().get_statuses().await? {
                println!(
                    "{:<8} {:<24} {}",
                    status.id,
                    status.name,
                    status.category.unwrap_or_default()
                );
            }
        }
        Command::Priorities => {
            for priority in jira.priorities().get_priorities().await? {
                println!("{:<8} {}", priority.id, priority.name);
            }
        }
        Command::Resolutions => {
            for resolution in jira.resolutions().get_resolutions().await? {
                println!("{:<8} {}", resolution.id, resolution.name);
            }
        }
        Command::LinkTypes => {
            for link_type in jira.links().get_link_types().await? {
                println!(
                    "{:<16} outward: {:<20} inward: {}",
                    link_type.name,
                    link_type.outward.unwrap_or_default(),
                    link_type.inward.unwrap_or_default()
                );
            }
        }
        Command::Fields {
            project,
            issue_types,
        } => {
            let options = CustomFieldFetchOptions {
                project_keys: project.into_iter().collect(),
                issue_type_names: issue_types,
                ..Default::default()
            };
            for field in jira.fields().get_custom_fields_with(&options).await? {
                let required = if field.is_required() { " *" } else { "" };
                println!(
                    "{:<20} {:<30} {}{}",
                    field.id,
                    field.name,
                    field.field_type().unwrap_or("-"),
                    required
                );
            }
        }
        Command::Show { key } => {
            let issue = jira.issues().get_issue(&key).await?;
            print_issue(&issue);
        }
        Command::Edit {
            key,
            fields,
            dry_run,
        } => {
            let mut issue = jira
                .issues()
                .get_issue(&key)
                .await
                .with_context(|| format!("Failed to fetch {}", key))?;

            let definitions = custom_field_definitions(jira, &fields, issue.project()).await?;
            fields.apply(&mut issue, &definitions)?;

            if dry_run {
                let payload = UpdatePayload::from_directives(&issue.get_updated_fields());
                println!("{}", serde_json::to_string_pretty(&payload.into_body())?);
            } else if jira.issues().update_issue(&issue).await? {
                println!("Updated {}", key);
            } else {
                println!("Nothing to update");
            }
        }
        Command::Create {
            project,
            issue_type,
            fields,
        } => {
            if fields.summary.is_none() {
                bail!("A summary is required to create an issue");
            }

            let mut issue = Issue::new();
            issue.set_project(Some(project.as_str()));
            issue.set_issue_type(Some(issue_type.as_str()));

            let definitions = custom_field_definitions(jira, &fields, Some(project.as_str())).await?;
            fields.apply(&mut issue, &definitions)?;

            let key = jira.issues().create_issue(&issue).await?;
            println!("Created {}", key);
        }
        Command::Link {
            outward,
            inward,
            link_type,
            comment,
        } => {
            jira.links()
                .create_link(&outward, &inward, &link_type, comment.as_deref())
                .await?;
            println!("Linked {} -> {} ({})", outward, inward, link_type);
        }
        Command::Links { key, types } => {
            let links = if types.is_empty() {
                jira.links().get_links_for_issue_key(&key).await?
            } else {
                let issue = jira.issues().get_issue(&key).await?;
                jira.links().get_links_for_issue(&issue, Some(types.as_slice())).await?
            };
            for link in links {
                println!(
                    "{} {} {}",
                    key_of(&link.outward_issue),
                    link.link_type.outward.as_deref().unwrap_or(&link.link_type.name),
                    key_of(&link.inward_issue)
                );
            }
        }
    }

    Ok(())
}

async fn custom_field_definitions(
    jira: &Jira,
    fields: &FieldArgs,
    project: Option<&str>,
) -> Result<Vec<CustomField>> {
    if fields.custom.is_empty() {
        return Ok(Vec::new());
    }

    let definitions = match project {
        Some(project) => jira.fields().get_custom_fields_for_project(project).await,
        None => jira.fields().get_custom_fields().await,
    };

    match definitions {
        Ok(definitions) => Ok(definitions),
        Err(e) if e.is_not_found() => {
            tracing::warn!("Custom field definitions unavailable: {}", e);
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

fn key_of(issue: &Issue) -> &str {
    issue.key().map(|k| k.as_str()).unwrap_or("?")
}

fn print_issue(issue: &Issue) {
    let named = |v: Option<&NamedValue>| v.map(|n| n.label().to_string());
    let date = |d: Option<NaiveDateTime>| d.map(|d| d.format("%Y-%m-%d %H:%M").to_string());

    let rows = [
        ("Key", named(issue.key())),
        ("Summary", issue.summary().map(str::to_string)),
        ("Project", issue.project().map(str::to_string)),
        ("Type", named(issue.issue_type())),
        ("Status", named(issue.status())),
        ("Priority", named(issue.priority())),
        ("Resolution", named(issue.resolution())),
        ("Assignee", issue.assignee().map(str::to_string)),
        ("Reporter", issue.reporter().map(str::to_string)),
        ("Environment", issue.environment().map(str::to_string)),
        ("Created", date(issue.created())),
        ("Updated", date(issue.updated())),
        ("Due", date(issue.due_date())),
    ];

    for (label, value) in rows {
        if let Some(value) = value {
            println!("{:<12} {}", format!("{}:", label), value);
        }
    }

    for custom in issue.custom_fields() {
        println!("{:<12} {}", format!("{}:", custom.id), custom.values.join(", "));
    }

    if let Some(description) = issue.description() {
        println!();
        println!("{}", description);
    }
}
