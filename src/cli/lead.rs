//
//  crm-client
//  cli/lead.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Lead commands

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use crate::api::{Lead, LeadApi, PageRequest};
use crate::interactive::{prompt_confirm_with_default, prompt_input};
use crate::output::{
    format_status, format_timestamp, print_field, print_header, truncate, TableOutput, TableRow,
};

use super::GlobalOptions;

/// Manage leads
#[derive(Args, Debug)]
pub struct LeadCommand {
    #[command(subcommand)]
    pub command: LeadSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum LeadSubcommand {
    /// List leads
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Search leads by field values
    Find(FindArgs),

    /// View a lead
    View(ViewArgs),

    /// Create a lead
    Create(CreateArgs),

    /// Update fields of a lead
    Update(UpdateArgs),

    /// Delete a lead
    Delete(DeleteArgs),

    /// Merge one lead into another
    Merge(MergeArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Maximum number of leads to return
    #[arg(long, short = 'L', default_value = "30")]
    pub limit: u32,

    /// Number of leads to skip
    #[arg(long, default_value = "0")]
    pub skip: u32,
}

#[derive(Args, Debug)]
pub struct FindArgs {
    /// Search criteria as FIELD=VALUE (e.g. name=Acme)
    #[arg(required = true, value_parser = parse_key_value)]
    pub criteria: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Lead ID
    pub id: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Lead name (prompted for when omitted)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Additional field as KEY=VALUE; VALUE is parsed as JSON when possible
    #[arg(long = "field", short = 'f', value_parser = parse_key_value)]
    pub fields: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Lead ID
    pub id: String,

    /// Field to change as KEY=VALUE; VALUE is parsed as JSON when possible
    #[arg(long = "field", short = 'f', required = true, value_parser = parse_key_value)]
    pub fields: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Lead ID
    pub id: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Lead merged away
    pub source: String,

    /// Lead that remains
    pub destination: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Parses `KEY=VALUE`, splitting on the first `=`.
fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

/// Interprets a field value as JSON (`42`, `true`, `["a"]`), or as a string.
fn field_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

impl LeadCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            LeadSubcommand::List(args) => self.list(args, global).await,
            LeadSubcommand::Find(args) => self.find(args, global).await,
            LeadSubcommand::View(args) => self.view(args, global).await,
            LeadSubcommand::Create(args) => self.create(args, global).await,
            LeadSubcommand::Update(args) => self.update(args, global).await,
            LeadSubcommand::Delete(args) => self.delete(args, global).await,
            LeadSubcommand::Merge(args) => self.merge(args, global).await,
        }
    }

    fn api(&self, global: &GlobalOptions) -> Result<LeadApi> {
        Ok(LeadApi::new(global.transport()?))
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let api = self.api(global)?;
        let request = PageRequest::new().limit(args.limit).skip(args.skip);
        let page = api
            .get_leads_page(&request, None)
            .await
            .context("Failed to list leads")?;

        let output = global.output();
        if output.is_json() {
            return output.write_list(&page.items, "");
        }

        output.write_list(&page.items, "No leads found.")?;
        if let Some(next) = page.next_request(&request) {
            let total = page
                .total_results
                .map(|t| format!(" of {t}"))
                .unwrap_or_default();
            println!(
                "Showing {}{}. Use --skip {} for more.",
                page.items.len(),
                total,
                next.skip.unwrap_or_default()
            );
        }
        Ok(())
    }

    async fn find(&self, args: &FindArgs, global: &GlobalOptions) -> Result<()> {
        let api = self.api(global)?;
        let leads = api
            .find_leads(args.criteria.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .await
            .context("Failed to search leads")?;

        global.output().write_list(&leads, "No matching leads.")
    }

    async fn view(&self, args: &ViewArgs, global: &GlobalOptions) -> Result<()> {
        let api = self.api(global)?;
        let lead = api
            .get_lead(&args.id)
            .await
            .with_context(|| format!("Failed to fetch lead {}", args.id))?;

        global.output().write(&lead)
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let name = match &args.name {
            Some(name) => name.clone(),
            None if global.prompts_enabled() => prompt_input("Lead name")?,
            None => bail!("--name is required when prompts are disabled"),
        };

        let mut lead = Lead::with_name(name);
        for (key, value) in &args.fields {
            lead.set(key.clone(), field_value(value));
        }

        let api = self.api(global)?;
        let created = api.add_lead(&lead).await.context("Failed to create lead")?;

        let output = global.output();
        if output.is_json() {
            return output.write(&created);
        }
        output.write_success(&format!(
            "Created lead {} ({})",
            style(created.display_name().unwrap_or("-")).bold(),
            created.id().unwrap_or("-")
        ));
        Ok(())
    }

    async fn update(&self, args: &UpdateArgs, global: &GlobalOptions) -> Result<()> {
        let mut lead = Lead::new();
        lead.set_id(args.id.clone());
        for (key, value) in &args.fields {
            lead.set(key.clone(), field_value(value));
        }

        let api = self.api(global)?;
        let updated = api
            .update_lead(&lead)
            .await
            .with_context(|| format!("Failed to update lead {}", args.id))?;

        let output = global.output();
        if output.is_json() {
            return output.write(&updated);
        }
        output.write_success(&format!("Updated lead {}", args.id));
        Ok(())
    }

    async fn delete(&self, args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
        if !args.yes && global.prompts_enabled() {
            let confirmed = prompt_confirm_with_default(
                &format!("Are you sure you want to delete lead {}?", args.id),
                false,
            )?;
            if !confirmed {
                println!("Cancelled.");
                return Ok(());
            }
        }

        let api = self.api(global)?;
        api.delete_lead(&args.id)
            .await
            .with_context(|| format!("Failed to delete lead {}", args.id))?;

        if global.json {
            let result = serde_json::json!({
                "success": true,
                "id": args.id,
                "deleted": true,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!(
                "{} Deleted lead {}",
                style("✓").green(),
                style(&args.id).cyan().bold()
            );
        }
        Ok(())
    }

    async fn merge(&self, args: &MergeArgs, global: &GlobalOptions) -> Result<()> {
        if !args.yes && global.prompts_enabled() {
            let confirmed = prompt_confirm_with_default(
                &format!(
                    "Merge lead {} into {}? The source lead will be removed.",
                    args.source, args.destination
                ),
                false,
            )?;
            if !confirmed {
                println!("Cancelled.");
                return Ok(());
            }
        }

        let mut source = Lead::new();
        source.set_id(args.source.clone());
        let mut destination = Lead::new();
        destination.set_id(args.destination.clone());

        let api = self.api(global)?;
        let envelope = api
            .merge_leads(&source, &destination)
            .await
            .context("Failed to merge leads")?;

        if global.json {
            let result = serde_json::json!({
                "success": true,
                "source": args.source,
                "destination": args.destination,
                "response": envelope.raw(),
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!(
                "{} Merged {} into {}",
                style("✓").green(),
                style(&args.source).cyan(),
                style(&args.destination).cyan().bold()
            );
        }
        Ok(())
    }
}

impl TableRow for Lead {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Status", "Created"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        vec![
            self.id().unwrap_or("-").to_string(),
            truncate(self.display_name().unwrap_or("-"), 40),
            format_status(self.status_label().unwrap_or("-"), color),
            format_timestamp(self.date_created()),
        ]
    }
}

impl TableOutput for Lead {
    fn print_table(&self, color: bool) {
        println!();
        print_header(self.display_name().unwrap_or("(unnamed lead)"));
        print_field("ID", self.id().unwrap_or("-"), color);
        print_field(
            "Status",
            &format_status(self.status_label().unwrap_or("-"), color),
            color,
        );
        if let Some(url) = self.url() {
            print_field("URL", url, color);
        }
        print_field("Created", &format_timestamp(self.date_created()), color);
        print_field("Updated", &format_timestamp(self.date_updated()), color);

        if let Some(description) = self.description().filter(|d| !d.is_empty()) {
            println!();
            println!("{}", description);
        }

        let contacts = self.contacts();
        if !contacts.is_empty() {
            println!();
            if color {
                println!("{}", style("Contacts").bold());
            } else {
                println!("Contacts");
            }
            for contact in &contacts {
                let emails = contact.emails().join(", ");
                println!(
                    "  {} {}",
                    contact.name().unwrap_or("-"),
                    if emails.is_empty() {
                        String::new()
                    } else {
                        format!("<{emails}>")
                    }
                );
            }
        }
        println!();
    }
}
