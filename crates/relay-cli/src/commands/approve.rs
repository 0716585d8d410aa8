use clap::Args;
use relay_chain::{Amount, Context, ExpenseRequest, approval_chain};

use crate::config::Config;
use crate::error::{CliError, Result};

#[derive(Args)]
pub(crate) struct ApproveArgs {
    /// Expense amount, e.g. 1500.00
    #[arg(long)]
    amount: Amount,

    /// Who is asking
    #[arg(long)]
    requester: String,

    /// What the money is for
    #[arg(long, default_value = "")]
    description: String,
}

pub(crate) fn run(args: ApproveArgs, config: &Config) -> Result<()> {
    let chain = approval_chain(config.tiers().to_vec()).ok_or(CliError::NoApprovalTiers)?;

    let mut expense = ExpenseRequest::new(args.amount, args.description, args.requester);
    chain
        .handle(&Context::new("approval"), &mut expense)
        .map_err(CliError::NotApproved)?;

    if let Some(approver) = &expense.approved_by {
        println!(
            "{} for {} approved by {approver}",
            expense.amount, expense.requester
        );
    }
    Ok(())
}
