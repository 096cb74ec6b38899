use crate::config::ProviderConfig;
use crate::core::xml_tree::XmlNode;
use crate::utils::error::{GatewayError, Result};
use quick_xml::escape::escape;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};

const SOAP_OPERATION: &str = "SubmitRequest";
const MAX_ERROR_BODY_CHARS: usize = 512;

/// 單次呼叫用的 SOAP client；離開呼叫範圍即釋放連線
pub struct SoapClient<'a> {
    client: Client,
    config: &'a ProviderConfig,
}

impl<'a> SoapClient<'a> {
    pub fn connect(config: &'a ProviderConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    /// 呼叫 `SubmitRequest(accesskey, requestBody)`，回傳 `SubmitRequestResult` 內的 XML
    pub async fn submit_request(&self, access_key: &str, request_body: &str) -> Result<String> {
        let endpoint = self.config.endpoint()?;
        let envelope = build_envelope(self.config.namespace(), access_key, request_body);

        tracing::debug!("📡 POST {} ({} bytes)", endpoint, envelope.len());

        let response = self
            .client
            .post(&endpoint)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", format!("\"{}\"", self.config.soap_action()))
            .body(envelope)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("📡 Provider response status: {}", status);

        let body = response.text().await?;
        extract_result(status, &body)
    }
}

fn build_envelope(namespace: &str, access_key: &str, request_body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
    <soap:Body>
        <{operation} xmlns="{namespace}">
            <accesskey>{access_key}</accesskey>
            <requestBody>{request_body}</requestBody>
        </{operation}>
    </soap:Body>
</soap:Envelope>"#,
        operation = SOAP_OPERATION,
        namespace = escape(namespace),
        access_key = escape(access_key),
        request_body = escape(request_body),
    )
}

fn extract_result(status: StatusCode, body: &str) -> Result<String> {
    let envelope = XmlNode::parse_str(body);

    // SOAP 1.1 的 fault 通常伴隨 HTTP 500，先確認有沒有 fault
    if let Ok(root) = &envelope {
        if let Some(fault) = root.path(&["Body", "Fault"]) {
            return Err(GatewayError::SoapFault {
                code: fault.child_text("faultcode").unwrap_or_default().to_string(),
                message: fault.child_text("faultstring").unwrap_or_default().to_string(),
            });
        }
    }

    if !status.is_success() {
        return Err(GatewayError::UpstreamStatusError {
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        });
    }

    let root = envelope.map_err(|e| GatewayError::SoapEnvelopeError {
        message: e.to_string(),
    })?;

    let operation_response = root
        .child("Body")
        .and_then(|b| b.children.first())
        .ok_or_else(|| GatewayError::SoapEnvelopeError {
            message: "soap:Body has no operation response".to_string(),
        })?;

    let result_name = format!("{}Result", SOAP_OPERATION);
    let result = operation_response
        .child(&result_name)
        .ok_or_else(|| GatewayError::SoapEnvelopeError {
            message: format!("{} has no {}", operation_response.name, result_name),
        })?;

    Ok(result.text.clone())
}
