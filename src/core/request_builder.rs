use crate::domain::model::CalculationRequest;
use quick_xml::escape::escape;

/// 請求模型目前沒有街道地址，provider 要求必填，先送固定值
pub const PLACEHOLDER_STREET_ADDRESS: &str = "ул.Ленина, д.1";

/// 產生 `Calculation` 模式的 OrderRequest，固定一筆 Cargo
pub fn build(request: &CalculationRequest) -> String {
    let packages = &request.packages;
    let street = escape(PLACEHOLDER_STREET_ADDRESS);

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<Request xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="OrderRequest">
    <Mode>Calculation</Mode>
    <OrderList>
        <Order>
            <ServiceList>
                <Service xsi:type="DeliveryService">
                    <Sender>
                        <Address>
                            <City>{from}</City>
                            <StreetAddress>{street}</StreetAddress>
                        </Address>
                    </Sender>
                    <Recipient>
                        <Address>
                            <City>{to}</City>
                            <StreetAddress>{street}</StreetAddress>
                        </Address>
                    </Recipient>
                    <CargoList>
                        <Cargo>
                            <Dimentions>
                                <Length>{length}</Length>
                                <Width>{width}</Width>
                                <Height>{height}</Height>
                            </Dimentions>
                            <Weight>{weight}</Weight>
                        </Cargo>
                    </CargoList>
                </Service>
            </ServiceList>
        </Order>
    </OrderList>
</Request>
"#,
        from = escape(request.from_location.as_str()),
        to = escape(request.to_location.as_str()),
        street = street,
        length = packages.length,
        width = packages.width,
        height = packages.height,
        weight = truncated_weight(packages.weight),
    )
}

/// 重量只接受整數，向零截斷
fn truncated_weight(weight: f64) -> i64 {
    weight.trunc() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::xml_tree::XmlNode;
    use crate::domain::model::PackageDimensions;

    fn request(from: &str, to: &str, weight: f64) -> CalculationRequest {
        CalculationRequest {
            from_location: from.to_string(),
            to_location: to.to_string(),
            packages: PackageDimensions {
                height: 10,
                length: 20,
                width: 15,
                weight,
            },
        }
    }

    #[test]
    fn test_build_embeds_cities_and_dimensions() {
        let xml = build(&request("Moscow", "Kazan", 2.5));
        let root = XmlNode::parse_str(&xml).unwrap();

        assert_eq!(root.name, "Request");
        assert_eq!(root.attribute("type"), Some("OrderRequest"));
        assert_eq!(root.child_text("Mode"), Some("Calculation"));

        let service = root
            .path(&["OrderList", "Order", "ServiceList", "Service"])
            .unwrap();
        assert_eq!(service.attribute("type"), Some("DeliveryService"));
        assert_eq!(
            service.path(&["Sender", "Address", "City"]).unwrap().text,
            "Moscow"
        );
        assert_eq!(
            service.path(&["Recipient", "Address", "City"]).unwrap().text,
            "Kazan"
        );
        assert_eq!(
            service
                .path(&["Sender", "Address", "StreetAddress"])
                .unwrap()
                .text,
            PLACEHOLDER_STREET_ADDRESS
        );

        let cargo_list = service.child("CargoList").unwrap();
        assert_eq!(cargo_list.children_named("Cargo").count(), 1);

        let cargo = cargo_list.child("Cargo").unwrap();
        assert_eq!(cargo.path(&["Dimentions", "Length"]).unwrap().text, "20");
        assert_eq!(cargo.path(&["Dimentions", "Width"]).unwrap().text, "15");
        assert_eq!(cargo.path(&["Dimentions", "Height"]).unwrap().text, "10");
        assert_eq!(cargo.child_text("Weight"), Some("2"));
    }

    #[test]
    fn test_weight_is_truncated_not_rounded() {
        assert_eq!(truncated_weight(2.99), 2);
        assert_eq!(truncated_weight(0.4), 0);
        assert_eq!(truncated_weight(7.0), 7);
    }

    #[test]
    fn test_city_names_are_escaped() {
        let xml = build(&request("A&B <City>", "Санкт-Петербург", 1.0));
        let root = XmlNode::parse_str(&xml).unwrap();

        let service = root
            .path(&["OrderList", "Order", "ServiceList", "Service"])
            .unwrap();
        assert_eq!(
            service.path(&["Sender", "Address", "City"]).unwrap().text,
            "A&B <City>"
        );
        assert_eq!(
            service.path(&["Recipient", "Address", "City"]).unwrap().text,
            "Санкт-Петербург"
        );
    }
}
