//! `voltstock orders` and `voltstock automations`: the shipping screen.

use anyhow::Context as _;
use clap::{Args, Subcommand};

use super::{cancel_on_interrupt, confirm, print_json, render_table, show_notice, Context};
use crate::editor::RuleForm;
use crate::models::{AutomationRule, Order, RuleKind, RuleStatus};
use crate::views::ShippingView;

#[derive(Subcommand, Debug)]
pub enum OrdersCommand {
    /// List orders.
    List,
    /// Delete an order after confirmation.
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum AutomationsCommand {
    /// List rules.
    List,
    /// Create a rule.
    Add(RuleArgs),
    /// Switch a rule between active and disabled.
    Toggle { id: String },
}

#[derive(Args, Debug, Default)]
pub struct RuleArgs {
    /// Numeric SKU the rule watches.
    #[arg(long)]
    pub sku: String,
    /// `stock` (reorder below a level) or `repeat` (every N days).
    #[arg(long = "type", default_value = "stock")]
    pub kind: RuleKind,
    /// Stock level or day interval that triggers the rule.
    #[arg(long)]
    pub condition: String,
    /// Quantity to order.
    #[arg(long)]
    pub amount: String,
    #[arg(long, default_value = "")]
    pub source_name: String,
    #[arg(long, default_value = "")]
    pub source_link: String,
    /// Create the rule disabled.
    #[arg(long)]
    pub disabled: bool,
}

impl RuleArgs {
    fn form(self) -> RuleForm {
        RuleForm {
            sku: self.sku,
            kind: self.kind,
            condition: self.condition,
            amount: self.amount,
            source_name: self.source_name,
            source_link: self.source_link,
            status: if self.disabled {
                RuleStatus::Disabled
            } else {
                RuleStatus::Active
            },
        }
    }
}

fn open(ctx: &Context) -> ShippingView {
    let view = ShippingView::new(ctx.remote.clone());
    cancel_on_interrupt(view.cancellation());
    view
}

pub async fn run_orders(cmd: OrdersCommand, ctx: &Context) -> anyhow::Result<()> {
    let view = open(ctx);
    view.reload_orders().await.context("Failed to load orders")?;
    match cmd {
        OrdersCommand::List => {
            let orders = view.orders();
            if ctx.json {
                return print_json(&orders);
            }
            println!("{}", render_orders(&orders));
        }
        OrdersCommand::Delete { id, yes } => {
            let prompt = view.request_delete_order(&id)?;
            if !confirm(&format!("Delete order {id}?"), yes).await? {
                println!("Cancelled");
                return Ok(());
            }
            view.delete_order(prompt.confirm())
                .await
                .context("Error deleting order")?;
            println!("Order {id} deleted ({} remaining)", view.orders().len());
        }
    }
    show_notice(view.notice());
    Ok(())
}

pub async fn run_automations(cmd: AutomationsCommand, ctx: &Context) -> anyhow::Result<()> {
    let view = open(ctx);
    view.reload_rules()
        .await
        .context("Failed to load automation rules")?;
    match cmd {
        AutomationsCommand::List => {
            let rules = view.rules();
            if ctx.json {
                return print_json(&rules);
            }
            println!("{}", render_rules(&rules));
        }
        AutomationsCommand::Add(args) => {
            view.create_rule(&args.form())
                .await
                .context("Error creating automation")?;
            println!("Rule created ({} rules)", view.rules().len());
        }
        AutomationsCommand::Toggle { id } => {
            let status = view
                .toggle_rule(&id)
                .await
                .context("Error updating automation status")?;
            println!("Rule {id} is now {status}");
        }
    }
    show_notice(view.notice());
    Ok(())
}

pub fn render_orders(orders: &[Order]) -> String {
    let headers: Vec<String> = ["Order", "Customer", "Items", "Status", "Tracking", "Date"]
        .map(String::from)
        .to_vec();
    let body: Vec<Vec<String>> = orders
        .iter()
        .map(|o| {
            vec![
                o.display_id(),
                o.customer.clone(),
                o.items.to_string(),
                o.status.clone(),
                o.tracking.clone(),
                o.date.clone(),
            ]
        })
        .collect();
    render_table(&headers, &body)
}

pub fn render_rules(rules: &[AutomationRule]) -> String {
    let headers: Vec<String> = ["ID", "SKU", "Type", "Condition", "Amount", "Source", "Status"]
        .map(String::from)
        .to_vec();
    let body: Vec<Vec<String>> = rules
        .iter()
        .map(|r| {
            let condition = match r.kind {
                RuleKind::Stock => format!("stock < {}", r.condition),
                RuleKind::Repeat => format!("every {} days", r.condition),
            };
            vec![
                r.id.clone(),
                r.sku.clone(),
                format!("{:?}", r.kind).to_lowercase(),
                condition,
                r.amount.to_string(),
                r.source_name.clone(),
                r.status.to_string(),
            ]
        })
        .collect();
    render_table(&headers, &body)
}
