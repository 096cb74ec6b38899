use crate::core::xml_tree::XmlNode;
use crate::domain::model::RawOffer;
use crate::utils::error::{GatewayError, Result};

const ORDER_PATH: [&str; 2] = ["OrderList", "Order"];
const RATE_SET_PATH: [&str; 4] = ["ServiceList", "Service", "Calculation", "DeliveryRateSet"];

/// `StatusList` 節點：收集到的錯誤碼與原始節點 (診斷用)
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderStatus {
    pub error_codes: Vec<String>,
    pub raw: serde_json::Value,
}

impl ProviderStatus {
    fn from_node(node: &XmlNode) -> Self {
        let error_codes = node
            .children_named("OrderStatus")
            .filter_map(|status| status.child_text("ErrorCode"))
            .map(str::to_string)
            .collect();

        Self {
            error_codes,
            raw: node.to_json(),
        }
    }

    pub fn is_error(&self) -> bool {
        !self.error_codes.is_empty()
    }
}

/// 從 XML 樹轉出的型別化中介結構
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEnvelope {
    pub has_order_list: bool,
    pub status: Option<ProviderStatus>,
    /// `DeliveryRateSet` 不存在時為 None
    pub rates: Option<Vec<DeliveryRate>>,
}

/// `DeliveryRate` 節點，欄位皆為選填，轉成 `RawOffer` 時才檢查
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryRate {
    pub min_term: Option<String>,
    pub sum: Option<String>,
    pub description: Option<String>,
    pub delivery_method: Option<String>,
}

impl DeliveryRate {
    fn from_node(node: &XmlNode) -> Self {
        let field = |name: &str| node.child_text(name).map(str::to_string);
        Self {
            min_term: field("MinTerm"),
            sum: field("Sum"),
            description: field("Description"),
            delivery_method: field("DeliveryMethod"),
        }
    }

    fn into_raw_offer(self, index: usize) -> Result<RawOffer> {
        let missing =
            |field: &str| GatewayError::structural(format!("DeliveryRate[{}] has no {}", index, field));

        Ok(RawOffer {
            min_term: self.min_term.ok_or_else(|| missing("MinTerm"))?,
            sum: self.sum.ok_or_else(|| missing("Sum"))?,
            description: self.description.ok_or_else(|| missing("Description"))?,
            delivery_method: self.delivery_method,
        })
    }
}

impl ProviderEnvelope {
    pub fn from_tree(root: &XmlNode) -> Self {
        // 根節點不是 Response 時視為沒有 OrderList 也沒有狀態
        if root.name != "Response" {
            return Self {
                has_order_list: false,
                status: None,
                rates: None,
            };
        }

        let order = root.path(&ORDER_PATH);
        let status = order
            .and_then(|o| o.child("StatusList"))
            .map(ProviderStatus::from_node);
        let rates: Option<Vec<DeliveryRate>> = order
            .and_then(|o| o.path(&RATE_SET_PATH))
            .map(|set| {
                set.children_named("DeliveryRate")
                    .map(DeliveryRate::from_node)
                    .collect()
            });

        Self {
            has_order_list: root.has_child("OrderList"),
            status,
            rates,
        }
    }

    /// 先看狀態再相信資料：provider 出錯時 HTTP 仍回 200
    pub fn into_offers(self) -> Result<Vec<RawOffer>> {
        let status_json = |status: &Option<ProviderStatus>| {
            status
                .as_ref()
                .map(|s| s.raw.clone())
                .unwrap_or(serde_json::Value::Null)
        };

        if self.status.as_ref().is_some_and(ProviderStatus::is_error) {
            return Err(GatewayError::ProviderStatusError {
                status: status_json(&self.status),
            });
        }

        if !self.has_order_list {
            return Err(GatewayError::ProviderShapeError {
                status: status_json(&self.status),
            });
        }

        let rates = self.rates.ok_or_else(|| {
            GatewayError::structural(
                "Response/OrderList/Order/ServiceList/Service/Calculation/DeliveryRateSet not found",
            )
        })?;

        if rates.is_empty() {
            return Err(GatewayError::structural(
                "DeliveryRateSet contains no DeliveryRate entries",
            ));
        }

        rates
            .into_iter()
            .enumerate()
            .map(|(index, rate)| rate.into_raw_offer(index))
            .collect()
    }
}

pub fn parse(raw_xml: &[u8]) -> Result<Vec<RawOffer>> {
    let root = XmlNode::parse(raw_xml)?;
    ProviderEnvelope::from_tree(&root).into_offers()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorKind;

    const SUCCESS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Response xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="OrderResponse">
    <OrderList>
        <Order>
            <StatusList>
                <OrderStatus><Status>Calculated</Status></OrderStatus>
            </StatusList>
            <ServiceList>
                <Service xsi:type="DeliveryService">
                    <Calculation>
                        <DeliveryRateSet>
                            <DeliveryRate>
                                <MinTerm>5</MinTerm>
                                <Sum>123.99</Sum>
                                <Description>Экспресс</Description>
                                <DeliveryMethod>дверь-дверь</DeliveryMethod>
                            </DeliveryRate>
                            <DeliveryRate>
                                <MinTerm>2</MinTerm>
                                <Sum>450.00</Sum>
                                <Description>Супер-экспресс до 14</Description>
                            </DeliveryRate>
                            <DeliveryRate>
                                <MinTerm>7</MinTerm>
                                <Sum>99.5</Sum>
                                <Description>Эконом</Description>
                                <DeliveryMethod>склад-склад</DeliveryMethod>
                            </DeliveryRate>
                        </DeliveryRateSet>
                    </Calculation>
                </Service>
            </ServiceList>
        </Order>
    </OrderList>
</Response>"#;

    #[test]
    fn test_parse_success_preserves_order() {
        let offers = parse(SUCCESS.as_bytes()).unwrap();

        assert_eq!(offers.len(), 3);
        assert_eq!(offers[0].min_term, "5");
        assert_eq!(offers[0].sum, "123.99");
        assert_eq!(offers[0].delivery_method.as_deref(), Some("дверь-дверь"));
        assert_eq!(offers[1].description, "Супер-экспресс до 14");
        assert_eq!(offers[1].delivery_method, None);
        assert_eq!(offers[2].description, "Эконом");
    }

    #[test]
    fn test_parse_single_rate() {
        let xml = r#"<Response><OrderList><Order><ServiceList><Service><Calculation>
            <DeliveryRateSet>
                <DeliveryRate><MinTerm>1</MinTerm><Sum>10</Sum><Description>A</Description></DeliveryRate>
            </DeliveryRateSet>
        </Calculation></Service></ServiceList></Order></OrderList></Response>"#;

        let offers = parse(xml.as_bytes()).unwrap();
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].description, "A");
    }

    #[test]
    fn test_error_code_wins_even_with_data_present() {
        let xml = SUCCESS.replace(
            "<OrderStatus><Status>Calculated</Status></OrderStatus>",
            "<OrderStatus><ErrorCode>105</ErrorCode><ErrorMessage>Город не найден</ErrorMessage></OrderStatus>",
        );

        let err = parse(xml.as_bytes()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ProviderStatusError);
        match err {
            GatewayError::ProviderStatusError { status } => {
                assert_eq!(status["OrderStatus"]["ErrorCode"], "105");
                assert_eq!(status["OrderStatus"]["ErrorMessage"], "Город не найден");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_code_in_any_order_status() {
        let xml = r#"<Response><OrderList><Order><StatusList>
            <OrderStatus><Status>Accepted</Status></OrderStatus>
            <OrderStatus><ErrorCode>7</ErrorCode></OrderStatus>
        </StatusList></Order></OrderList></Response>"#;

        let err = parse(xml.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProviderStatusError);
    }

    #[test]
    fn test_missing_order_list_is_shape_error() {
        let xml = r#"<Response><Message>Access denied</Message></Response>"#;

        let err = parse(xml.as_bytes()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ProviderShapeError);
        assert_eq!(err.detail(), Some(serde_json::Value::Null));
    }

    #[test]
    fn test_unexpected_root_is_shape_error() {
        let err = parse(b"<Fault><Reason>nope</Reason></Fault>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProviderShapeError);
    }

    #[test]
    fn test_missing_rate_path_is_structural_error() {
        let xml = r#"<Response><OrderList><Order>
            <StatusList><OrderStatus><Status>OK</Status></OrderStatus></StatusList>
            <ServiceList><Service/></ServiceList>
        </Order></OrderList></Response>"#;

        let err = parse(xml.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralParseError);
    }

    #[test]
    fn test_empty_rate_set_is_structural_error() {
        let xml = r#"<Response><OrderList><Order><ServiceList><Service><Calculation>
            <DeliveryRateSet/>
        </Calculation></Service></ServiceList></Order></OrderList></Response>"#;

        let err = parse(xml.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralParseError);
    }

    #[test]
    fn test_rate_missing_sum_is_structural_error() {
        let xml = r#"<Response><OrderList><Order><ServiceList><Service><Calculation>
            <DeliveryRateSet>
                <DeliveryRate><MinTerm>1</MinTerm><Description>A</Description></DeliveryRate>
            </DeliveryRateSet>
        </Calculation></Service></ServiceList></Order></OrderList></Response>"#;

        let err = parse(xml.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralParseError);
        assert!(err.to_string().contains("Sum"));
    }

    #[test]
    fn test_malformed_xml_is_structural_error() {
        let err = parse(b"<Response><OrderList>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralParseError);
    }
}
