use chrono::Utc;
use serde::Serialize;

use crate::{
    assembler::{ExternalAlias, ModulePathMapper, RenderInput, Renderer},
    error::{DocsError, Result},
    model::SourceUnitModel,
};

/// Pretty-printed JSON per module, with type references mapped and a metadata envelope.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn file_extension(&self) -> &str {
        "json"
    }

    fn render(&self, input: &RenderInput<'_>, mapper: &mut ModulePathMapper<'_>) -> Result<String> {
        let documentation = mapper.map_model(input.model);
        let externals = mapper.external_aliases();
        let payload = JsonPayload {
            version: env!("CARGO_PKG_VERSION"),
            generated_at: Utc::now().to_rfc3339(),
            module: input.module_id,
            is_main: input.is_main,
            externals,
            documentation: &documentation,
        };

        serde_json::to_string_pretty(&payload).map_err(|error| DocsError::Render {
            module_id: input.module_id.to_string(),
            message: error.to_string(),
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonPayload<'a> {
    version: &'static str,
    generated_at: String,
    module: &'a str,
    is_main: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    externals: Vec<ExternalAlias>,
    documentation: &'a SourceUnitModel,
}
