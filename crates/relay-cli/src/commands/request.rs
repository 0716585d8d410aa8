use clap::Args;
use relay_chain::{Context, Request, standard_pipeline};

use crate::config::Config;
use crate::error::{CliError, Result};

#[derive(Args)]
pub(crate) struct RequestArgs {
    /// HTTP method
    #[arg(long, default_value = "GET")]
    method: String,

    /// Request path
    #[arg(long)]
    path: String,

    /// Header in 'Name: value' form (repeatable)
    #[arg(long = "header", short = 'H')]
    headers: Vec<String>,

    /// Role of the caller
    #[arg(long, default_value = "")]
    role: String,

    /// JSON request body
    #[arg(long)]
    body: Option<String>,

    /// Send the same request this many times through one pipeline
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    repeat: u32,
}

pub(crate) fn run(args: RequestArgs, config: &Config) -> Result<()> {
    let request = build_request(&args)?;
    let chain = standard_pipeline(config.pipeline());

    let mut rejected = 0;
    let mut last_rejection = None;

    for attempt in 1..=args.repeat {
        let ctx = Context::new(format!("req-{attempt}"));
        let mut request = request.clone();

        match chain.handle(&ctx, &mut request) {
            Ok(()) => match request.response {
                Some(response) => {
                    println!("#{attempt} {} {}", response.status, response.body);
                }
                None => println!("#{attempt} passed without a response"),
            },
            Err(e) => {
                println!("#{attempt} rejected by '{}': {}", e.handler(), e.reason());
                rejected += 1;
                last_rejection = Some(e);
            }
        }
    }

    match last_rejection {
        None => Ok(()),
        Some(last) => Err(CliError::Rejected {
            rejected,
            total: args.repeat,
            last,
        }),
    }
}

fn build_request(args: &RequestArgs) -> Result<Request> {
    let mut request = Request::new(&args.method, &args.path).with_role(&args.role);

    for header in &args.headers {
        let (name, value) = parse_header(header)?;
        request = request.with_header(name, value);
    }

    if let Some(body) = &args.body {
        let body = serde_json::from_str(body).map_err(CliError::InvalidBody)?;
        request = request.with_body(body);
    }

    Ok(request)
}

fn parse_header(header: &str) -> Result<(&str, &str)> {
    let (name, value) = header
        .split_once(':')
        .ok_or_else(|| CliError::InvalidHeader(header.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::InvalidHeader(header.to_string()));
    }
    Ok((name, value.trim()))
}
