use crate::schema::registry::{FieldDef, FieldType, SchemaError, SchemaRegistry, TableDef};

// Mirrors config/schema/dealership.json; a test keeps the two in sync.
pub fn dealership_schema() -> Result<SchemaRegistry, SchemaError> {
    use FieldType::*;

    let vehicles = TableDef {
        name: "vehicles".into(),
        relation: "cars".into(),
        description: "在售車輛".into(),
        fields: vec![
            field("brand", "廠牌", "廠牌", Text, None),
            field("model", "車款", "車款", Text, None),
            field("year", "年份", "年份", Number, None),
            field("warranty", "保固", "保固", Text, None),
            field("inspection-period", "驗車週期", "驗車週期", Text, None),
            field("price", "車輛售價", "車輛售價", Number, None),
            field("mileage", "行駛里程", "行駛里程", Number, None),
        ],
    };

    let company = TableDef {
        name: "company".into(),
        relation: "company".into(),
        description: "公司資訊".into(),
        fields: vec![
            field("name", "公司名稱", "公司名稱", Text, Some("亞鈺")),
            field("address", "地址", "公司地址", Text, Some("號")),
            field("hours", "營業時間", "營業時間", Text, Some(":")),
            field("phone", "聯絡電話", "聯絡電話", Text, Some("0")),
        ],
    };

    SchemaRegistry::new("1", vec![vehicles, company])
}

fn field(
    name: &str,
    column: &str,
    label: &str,
    field_type: FieldType,
    probe: Option<&str>,
) -> FieldDef {
    FieldDef {
        name: name.into(),
        column: column.into(),
        label: label.into(),
        field_type,
        probe: probe.map(Into::into),
    }
}
