use crate::utils::error::{GatewayError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

/// 通用 XML 節點：名稱 (去除命名空間前綴)、屬性、子節點與文字內容
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    pub text: String,
}

impl XmlNode {
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let xml = std::str::from_utf8(raw).map_err(|e| {
            GatewayError::structural(format!("XML document is not valid UTF-8: {}", e))
        })?;
        Self::parse_str(xml)
    }

    pub fn parse_str(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => stack.push(Self::open(&e)?),
                Event::Empty(e) => {
                    let node = Self::open(&e)?;
                    Self::attach(&mut stack, &mut root, node)?;
                }
                Event::End(_) => {
                    let node = stack
                        .pop()
                        .ok_or_else(|| GatewayError::structural("unexpected closing tag"))?;
                    Self::attach(&mut stack, &mut root, node)?;
                }
                Event::Text(t) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&t.unescape()?);
                    }
                }
                Event::CData(c) => {
                    if let Some(current) = stack.last_mut() {
                        current
                            .text
                            .push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(GatewayError::structural(format!(
                "unexpected end of document inside <{}>",
                open.name
            )));
        }

        root.ok_or_else(|| GatewayError::structural("XML document has no root element"))
    }

    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();

        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            // xmlns 宣告不是資料
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            ..Default::default()
        })
    }

    fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) -> Result<()> {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(node);
        } else if root.is_none() {
            *root = Some(node);
        } else {
            return Err(GatewayError::structural(format!(
                "unexpected second root element <{}>",
                node.name
            )));
        }
        Ok(())
    }

    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.child(name).is_some()
    }

    /// 依序走訪子節點路徑，每一層取第一個同名節點
    pub fn path(&self, segments: &[&str]) -> Option<&XmlNode> {
        segments
            .iter()
            .try_fold(self, |node, segment| node.child(segment))
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// 子節點的文字內容
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    /// 轉成巢狀 JSON 結構作為診斷資訊：屬性以 `@` 開頭，重複的子節點合併為陣列
    pub fn to_json(&self) -> Value {
        if self.attributes.is_empty() && self.children.is_empty() {
            return if self.text.is_empty() {
                Value::Null
            } else {
                Value::String(self.text.clone())
            };
        }

        let mut map = Map::new();
        for (key, value) in &self.attributes {
            map.insert(format!("@{}", key), Value::String(value.clone()));
        }

        for child in &self.children {
            let value = child.to_json();
            match map.remove(&child.name) {
                None => {
                    map.insert(child.name.clone(), value);
                }
                Some(Value::Array(mut items)) => {
                    items.push(value);
                    map.insert(child.name.clone(), Value::Array(items));
                }
                Some(existing) => {
                    map.insert(child.name.clone(), Value::Array(vec![existing, value]));
                }
            }
        }

        if !self.text.is_empty() {
            map.insert("#text".to_string(), Value::String(self.text.clone()));
        }

        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorKind;

    #[test]
    fn test_parse_nested_document_with_attributes() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
            <Response xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="OrderResponse">
                <OrderList>
                    <Order><Number>1</Number></Order>
                </OrderList>
            </Response>"#;

        let root = XmlNode::parse_str(xml).unwrap();

        assert_eq!(root.name, "Response");
        assert_eq!(root.attribute("type"), Some("OrderResponse"));
        assert_eq!(root.attributes.len(), 1);
        assert_eq!(
            root.path(&["OrderList", "Order", "Number"]).map(|n| n.text.as_str()),
            Some("1")
        );
        assert!(root.path(&["OrderList", "Missing"]).is_none());
    }

    #[test]
    fn test_namespace_prefixes_are_stripped() {
        let xml = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
                <soap:Body><Ping/></soap:Body>
            </soap:Envelope>"#;

        let root = XmlNode::parse_str(xml).unwrap();

        assert_eq!(root.name, "Envelope");
        assert!(root.attributes.is_empty());
        assert!(root.path(&["Body", "Ping"]).is_some());
    }

    #[test]
    fn test_escaped_text_and_cdata_are_decoded() {
        let xml = "<Result><Escaped>&lt;Response/&gt;</Escaped><Raw><![CDATA[<Response/>]]></Raw></Result>";

        let root = XmlNode::parse_str(xml).unwrap();

        assert_eq!(root.child_text("Escaped"), Some("<Response/>"));
        assert_eq!(root.child_text("Raw"), Some("<Response/>"));
    }

    #[test]
    fn test_to_json_groups_repeated_children() {
        let xml = r#"<StatusList>
                <OrderStatus><ErrorCode>10</ErrorCode></OrderStatus>
                <OrderStatus><ErrorCode>20</ErrorCode></OrderStatus>
                <Empty/>
            </StatusList>"#;

        let root = XmlNode::parse_str(xml).unwrap();

        assert_eq!(root.children_named("OrderStatus").count(), 2);
        assert_eq!(
            root.to_json(),
            serde_json::json!({
                "OrderStatus": [{"ErrorCode": "10"}, {"ErrorCode": "20"}],
                "Empty": null
            })
        );
    }

    #[test]
    fn test_malformed_xml_is_a_structural_error() {
        let err = XmlNode::parse_str("<Response><OrderList></Response>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralParseError);

        let err = XmlNode::parse_str("<Response><OrderList>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralParseError);

        let err = XmlNode::parse(b"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralParseError);
    }
}
