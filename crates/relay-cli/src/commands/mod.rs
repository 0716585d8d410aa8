mod approve;
mod checkout;
mod request;

use clap::Subcommand;

pub(crate) use approve::ApproveArgs;
pub(crate) use checkout::CheckoutArgs;
pub(crate) use request::RequestArgs;

use crate::config::Config;
use crate::error::Result;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Send requests through the standard handler pipeline
    Request(RequestArgs),
    /// Route an expense through the approval tiers
    Approve(ApproveArgs),
    /// Run the checkout saga against an in-memory store
    Checkout(CheckoutArgs),
}

impl Commands {
    pub(crate) fn execute(self, config: &Config) -> Result<()> {
        match self {
            Self::Request(args) => request::run(args, config),
            Self::Approve(args) => approve::run(args, config),
            Self::Checkout(args) => checkout::run(args),
        }
    }
}
