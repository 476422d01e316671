//! Resource service implementation.
//!
//! The ResourceService answers resource listing and reads for one session.

use rmcp::model::{
    AnnotateAble, RawResource, ReadResourceResult, Resource, ResourceContents, ResourceTemplate,
};
use tracing::info;

use super::definitions::{EventWidgetResource, ResourceDefinition};
use super::error::ResourceError;
use super::widget::WidgetDocument;

/// Service for listing and reading resources.
pub struct ResourceService {
    widget: WidgetDocument,
}

impl ResourceService {
    /// Create a new ResourceService serving the given widget.
    pub fn new(widget: WidgetDocument) -> Self {
        Self { widget }
    }

    /// List all available resources.
    pub fn list_resources(&self) -> Vec<Resource> {
        let mut raw = RawResource::new(EventWidgetResource::URI, EventWidgetResource::NAME);
        raw.description = Some(EventWidgetResource::DESCRIPTION.to_string());
        raw.mime_type = Some(EventWidgetResource::MIME_TYPE.to_string());
        vec![raw.no_annotation()]
    }

    /// List all available resource templates. There are none.
    pub fn list_resource_templates(&self) -> Vec<ResourceTemplate> {
        Vec::new()
    }

    /// Read a resource by URI.
    pub fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        if uri != EventWidgetResource::URI {
            return Err(ResourceError::not_found(uri));
        }

        info!("Serving widget resource {}", uri);
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: uri.to_string(),
                mime_type: Some(EventWidgetResource::MIME_TYPE.to_string()),
                text: self.widget.html().to_string(),
                meta: Some(EventWidgetResource::meta()),
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service() -> ResourceService {
        ResourceService::new(WidgetDocument::new("<html>widget</html>"))
    }

    #[test]
    fn test_list_resources() {
        let resources = service().list_resources();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].raw.uri, "ui://widget/events.html");
        assert_eq!(resources[0].raw.mime_type.as_deref(), Some("text/html+skybridge"));
    }

    #[test]
    fn test_read_widget() {
        let result = service().read_resource("ui://widget/events.html").unwrap();
        let value = serde_json::to_value(&result).unwrap();
        let content = &value["contents"][0];

        assert_eq!(content["uri"], "ui://widget/events.html");
        assert_eq!(content["mimeType"], "text/html+skybridge");
        assert_eq!(content["text"], "<html>widget</html>");
        assert_eq!(content["_meta"], json!({ "openai/widgetPrefersBorder": true }));
    }

    #[test]
    fn test_read_nonexistent_resource() {
        let result = service().read_resource("ui://widget/other.html");
        assert!(matches!(result, Err(ResourceError::NotFound(_))));
    }
}
