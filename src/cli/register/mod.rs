//! Register command - signs up through the page controller

use std::sync::Arc;

use anyhow::bail;
use clap::Args;

use crate::client::{FormField, FormKind, HttpRegistrationSink, PageController, SubmitOutcome};

/// Arguments for the register command
#[derive(Args, Clone, Debug)]
pub struct RegisterArgs {
    /// Contact name
    #[arg(long)]
    pub name: String,

    /// Contact email
    #[arg(long)]
    pub email: String,

    /// Team size, 1 to 10
    #[arg(long)]
    pub team: String,

    /// Base URL of the registration API
    #[arg(long, default_value = "http://localhost:3000")]
    pub api_url: String,

    /// Validate and confirm locally without calling the API
    #[arg(long)]
    pub local: bool,
}

/// Run the register command
pub async fn run(args: RegisterArgs) -> anyhow::Result<()> {
    let mut controller = PageController::new();

    if !args.local {
        controller = controller.with_sink(Arc::new(HttpRegistrationSink::new(&args.api_url)?));
    }

    controller.input(FormKind::Main, FormField::Name, args.name).await;
    controller.input(FormKind::Main, FormField::Email, args.email).await;
    controller.input(FormKind::Main, FormField::Team, args.team).await;

    match controller.submit(FormKind::Main).await {
        SubmitOutcome::Registered { message } => {
            println!("{}", message);
            Ok(())
        }
        SubmitOutcome::Rejected { message } => bail!(message),
        SubmitOutcome::Invalid(fields) => {
            let names: Vec<&str> = fields.iter().map(|f| field_label(*f)).collect();
            bail!("Please check: {}", names.join(", "))
        }
    }
}

fn field_label(field: FormField) -> &'static str {
    match field {
        FormField::Name => "name",
        FormField::Email => "email",
        FormField::Team => "team size",
    }
}
