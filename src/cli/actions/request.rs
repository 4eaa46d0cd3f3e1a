use crate::{
    api::{Method, OutboundRequest},
    cli::{actions::client::Client, globals::GlobalArgs},
};
use anyhow::Result;
use serde_json::Value;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub method: Method,
    pub path: String,
    pub data: Option<Value>,
}

/// Sends one request through the pipeline and prints the payload.
/// # Errors
/// Returns an error if the pipeline rejects the call.
pub async fn execute(args: Args) -> Result<()> {
    let client = Client::connect(&args.globals)?;

    let mut request = OutboundRequest::new(args.method, args.path);
    if let Some(data) = args.data {
        request = request.with_body(data);
    }

    let result = client.pipeline.send(request).await;
    client.report_forced_navigation();
    let payload = result?;

    println!("{}", serde_json::to_string_pretty(&payload)?);

    Ok(())
}
