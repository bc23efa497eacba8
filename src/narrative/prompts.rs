use serde_json::{Value, json};

pub const SYSTEM_PROMPT: &str = "You are a financial analyst reviewing one month of project results. \
Be brief and concrete. Use only the numbers in the supplied JSON and never invent figures. \
Return a management summary, at least five issues ordered by severity, short recommendations, \
the three to five projects with the weakest margin, and the headline totals. \
If prevTotals is present, comment on the trend against that month.";

pub const SCHEMA_NAME: &str = "monthly_report";

/// Strict JSON schema for the structured response. Strict mode requires
/// every property to be listed in `required` and no extra properties.
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "risk_level": { "type": "string", "enum": ["green", "yellow", "red"] },
            "summary_text": { "type": "string" },
            "issues": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "properties": {
                        "severity": { "type": "string", "enum": ["low", "medium", "high"] },
                        "title": { "type": "string" },
                        "details": { "type": "string" }
                    },
                    "required": ["severity", "title", "details"]
                }
            },
            "recommendations": { "type": "array", "items": { "type": "string" } },
            "top_projects": { "type": "array", "items": { "type": "string" } },
            "metrics": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "revenue": { "type": "number" },
                    "costs": { "type": "number" },
                    "profit": { "type": "number" },
                    "margin": { "type": "number" }
                },
                "required": ["revenue", "costs", "profit", "margin"]
            }
        },
        "required": ["risk_level", "summary_text", "issues", "recommendations", "top_projects", "metrics"]
    })
}
