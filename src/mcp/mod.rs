//! MCP (Model Context Protocol) server for editor and assistant integration.
//!
//! Line-delimited JSON-RPC 2.0 on stdio. Exposes tools: analyze_website,
//! analyze_markup.

use crate::analyzer::AnalysisEngine;
use crate::fetch::{MarkupSource, StaticSource};
use crate::{AnalysisRequest, AnalysisResult, TrackSelector};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};

/// MCP JSON-RPC request
#[derive(Debug, Deserialize, Serialize)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: Option<String>,
    pub id: Option<serde_json::Value>,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

/// MCP JSON-RPC response
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

const METHOD_NOT_FOUND: i32 = -32601;

/// Tool definition for MCP tools/list
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolDef {
    name: &'static str,
    description: &'static str,
    input_schema: InputSchema,
}

#[derive(Debug, Serialize)]
struct InputSchema {
    #[serde(rename = "type")]
    typ: &'static str,
    properties: serde_json::Value,
    required: Vec<&'static str>,
}

fn track_property() -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "enum": ["all", "seo", "geo", "compatibility", "eco", "ux"],
        "description": "Track to score (default: all)"
    })
}

fn tool_defs() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "analyze_website",
            description: "Fetch a web page and score it for SEO, GEO, compatibility, eco and UX",
            input_schema: InputSchema {
                typ: "object",
                properties: serde_json::json!({
                    "url": { "type": "string", "description": "Page URL (http/https) or local HTML file" },
                    "track": track_property(),
                    "name": { "type": "string", "description": "Display name (default: the url)" }
                }),
                required: vec!["url"],
            },
        },
        ToolDef {
            name: "analyze_markup",
            description: "Score HTML markup supplied inline, without fetching anything",
            input_schema: InputSchema {
                typ: "object",
                properties: serde_json::json!({
                    "html": { "type": "string", "description": "Full page markup" },
                    "track": track_property(),
                    "name": { "type": "string", "description": "Display name (default: inline)" }
                }),
                required: vec!["html"],
            },
        },
    ]
}

/// Handle a single JSON-RPC request and return a response.
///
/// Returns `None` for notifications, which get no reply.
pub fn handle_request(req: &JsonRpcRequest, source: &dyn MarkupSource) -> Option<JsonRpcResponse> {
    if req.id.is_none() && req.method.starts_with("notifications/") {
        return None;
    }

    let id = req.id.clone();
    let result = match req.method.as_str() {
        "initialize" => serde_json::json!({
            "protocolVersion": "0.1.0",
            "capabilities": { "tools": {} },
            "serverInfo": { "name": "pagelens", "version": env!("CARGO_PKG_VERSION") }
        }),
        "tools/list" => serde_json::json!({ "tools": tool_defs() }),
        "tools/call" => call_tool(req.params.as_ref(), source),
        other => {
            return Some(JsonRpcResponse {
                jsonrpc: "2.0",
                id,
                result: None,
                error: Some(JsonRpcError {
                    code: METHOD_NOT_FOUND,
                    message: format!("Method not found: {}", other),
                }),
            });
        }
    };

    Some(JsonRpcResponse {
        jsonrpc: "2.0",
        id,
        result: Some(result),
        error: None,
    })
}

fn call_tool(params: Option<&serde_json::Value>, source: &dyn MarkupSource) -> serde_json::Value {
    let (name, args) = params
        .and_then(|p| p.get("params").or(Some(p)))
        .map(|p| {
            let name = p.get("name").and_then(|n| n.as_str()).unwrap_or("");
            let args = p
                .get("arguments")
                .and_then(|a| a.as_object())
                .cloned()
                .unwrap_or_default();
            (name, args)
        })
        .unwrap_or(("", serde_json::Map::new()));

    let arg = |key: &str| args.get(key).and_then(|v| v.as_str()).unwrap_or("").to_string();

    let result = parse_track(args.get("track")).and_then(|track| match name {
        "analyze_website" => run_analyze_website(&arg("url"), &arg("name"), track, source),
        "analyze_markup" => match args.get("html").and_then(|v| v.as_str()) {
            Some(html) => run_analyze_markup(html, &arg("name"), track),
            None => Err(anyhow::anyhow!("Missing required argument: html")),
        },
        _ => Err(anyhow::anyhow!("Unknown tool: {}", name)),
    });

    match result {
        Ok(val) => {
            let text = serde_json::to_string(&val).unwrap_or_else(|_| "{}".to_string());
            serde_json::json!({ "content": [{ "type": "text", "text": text }] })
        }
        Err(e) => {
            tracing::warn!(tool = name, error = %e, "tool call failed");
            serde_json::json!({
                "content": [{ "type": "text", "text": format!("Error: {}", e) }],
                "isError": true
            })
        }
    }
}

fn parse_track(value: Option<&serde_json::Value>) -> anyhow::Result<TrackSelector> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(TrackSelector::All),
        Some(serde_json::Value::String(s)) => s.parse().map_err(|e: String| anyhow::anyhow!(e)),
        Some(other) => anyhow::bail!("Invalid argument: track must be a string, got {}", other),
    }
}

fn run_analyze_website(
    url: &str,
    name: &str,
    track: TrackSelector,
    source: &dyn MarkupSource,
) -> anyhow::Result<AnalysisResult> {
    if url.trim().is_empty() {
        anyhow::bail!("Missing required argument: url");
    }
    let request = AnalysisRequest::new(url, name, track);
    Ok(AnalysisEngine::new().run(&request, source)?)
}

fn run_analyze_markup(
    html: &str,
    name: &str,
    track: TrackSelector,
) -> anyhow::Result<AnalysisResult> {
    let name = if name.is_empty() { "inline" } else { name };
    let request = AnalysisRequest::new("inline", name, track);
    Ok(AnalysisEngine::new().run(&request, &StaticSource::new(html))?)
}

/// Run the MCP server loop (stdin / stdout).
pub fn run_mcp_server(source: &dyn MarkupSource) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let reader = BufReader::new(stdin.lock());

    tracing::info!("MCP server listening on stdio");
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let req: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed request");
                continue;
            }
        };

        if let Some(response) = handle_request(&req, source) {
            writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
