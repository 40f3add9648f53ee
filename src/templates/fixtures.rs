//! Built-in sample templates, used whenever the hosted store is unreachable
//! or not configured. Field sets mirror the store schema: every sample field
//! is required and carries an explicit form position.

use chrono::Utc;

use super::{FieldType, Template, TemplateField};
use crate::chat::types::DocumentType;

const PURCHASE_SALE_CONTENT: &str = r#"ДОГОВОР КУПЛИ-ПРОДАЖИ

г. {{city}} {{date}}

{{seller_name}}, именуемый в дальнейшем «Продавец», с одной стороны, и {{buyer_name}}, именуемый в дальнейшем «Покупатель», с другой стороны, заключили настоящий Договор о нижеследующем:

1. ПРЕДМЕТ ДОГОВОРА

1.1. Продавец обязуется передать в собственность Покупателя, а Покупатель обязуется принять и оплатить следующее имущество: {{property_description}} (далее - "Имущество").

2. ЦЕНА И ПОРЯДОК РАСЧЕТОВ

2.1. Стоимость Имущества составляет {{price}} ({{price_in_words}}) тенге.
2.2. Оплата производится в следующем порядке: {{payment_terms}}.

3. ПЕРЕДАЧА ИМУЩЕСТВА

3.1. Имущество передается Продавцом Покупателю в течение {{delivery_period}} с момента подписания настоящего Договора.
3.2. Передача Имущества осуществляется по акту приема-передачи, подписываемому обеими сторонами.

4. ОТВЕТСТВЕННОСТЬ СТОРОН

4.1. За неисполнение или ненадлежащее исполнение обязательств по настоящему Договору стороны несут ответственность в соответствии с законодательством Республики Казахстан.

5. ЗАКЛЮЧИТЕЛЬНЫЕ ПОЛОЖЕНИЯ

5.1. Настоящий Договор вступает в силу с момента его подписания обеими сторонами и действует до полного исполнения сторонами своих обязательств.
5.2. Все изменения и дополнения к настоящему Договору действительны, если они совершены в письменной форме и подписаны обеими сторонами.
5.3. Настоящий Договор составлен в двух экземплярах, имеющих одинаковую юридическую силу, по одному для каждой из сторон.

6. РЕКВИЗИТЫ И ПОДПИСИ СТОРОН

Продавец:                               Покупатель:
{{seller_details}}                      {{buyer_details}}

____________ / {{seller_name}} /         ____________ / {{buyer_name}} /"#;

const LEASE_CONTENT: &str = r#"ДОГОВОР АРЕНДЫ

г. {{city}} {{date}}

{{lessor_name}}, именуемый в дальнейшем «Арендодатель», с одной стороны, и {{lessee_name}}, именуемый в дальнейшем «Арендатор», с другой стороны, заключили настоящий Договор о нижеследующем:

1. ПРЕДМЕТ ДОГОВОРА

1.1. Арендодатель обязуется предоставить Арендатору во временное пользование следующее недвижимое имущество: {{property_description}} (далее - "Помещение").
1.2. Помещение будет использоваться для: {{purpose}}.

2. СРОК АРЕНДЫ

2.1. Настоящий Договор заключен сроком на {{rental_period}} с {{start_date}} по {{end_date}}.

3. АРЕНДНАЯ ПЛАТА И ПОРЯДОК РАСЧЕТОВ

3.1. Ежемесячная арендная плата составляет {{monthly_rent}} ({{monthly_rent_in_words}}) тенге.
3.2. Арендная плата вносится не позднее {{payment_day}} числа каждого месяца.
3.3. Способ оплаты: {{payment_method}}."#;

pub fn templates() -> Vec<Template> {
    vec![
        Template {
            id: "1".to_string(),
            name: "Договор купли-продажи".to_string(),
            description: "Базовый шаблон договора купли-продажи имущества".to_string(),
            content: PURCHASE_SALE_CONTENT.to_string(),
            document_type: DocumentType::PurchaseSale,
            created_at: Utc::now(),
        },
        Template {
            id: "2".to_string(),
            name: "Договор аренды помещения".to_string(),
            description: "Базовый шаблон договора аренды недвижимого имущества".to_string(),
            content: LEASE_CONTENT.to_string(),
            document_type: DocumentType::Lease,
            created_at: Utc::now(),
        },
    ]
}

pub fn fields(template_id: &str) -> Vec<TemplateField> {
    let rows: &[(&str, &str, &str, FieldType, i32)] = match template_id {
        "1" => &[
            ("1", "city", "Город", FieldType::Text, 1),
            ("2", "date", "Дата договора", FieldType::Date, 2),
            ("3", "seller_name", "ФИО продавца", FieldType::Text, 3),
            ("4", "buyer_name", "ФИО покупателя", FieldType::Text, 4),
            ("5", "property_description", "Описание имущества", FieldType::Textarea, 5),
            ("6", "price", "Стоимость (цифрами)", FieldType::Number, 6),
            ("7", "price_in_words", "Стоимость (прописью)", FieldType::Text, 7),
            ("8", "payment_terms", "Условия оплаты", FieldType::Textarea, 8),
            ("9", "delivery_period", "Срок передачи имущества", FieldType::Text, 9),
            ("10", "seller_details", "Реквизиты продавца", FieldType::Textarea, 10),
            ("11", "buyer_details", "Реквизиты покупателя", FieldType::Textarea, 11),
        ],
        "2" => &[
            ("12", "city", "Город", FieldType::Text, 1),
            ("13", "date", "Дата договора", FieldType::Date, 2),
            ("14", "lessor_name", "ФИО арендодателя", FieldType::Text, 3),
            ("15", "lessee_name", "ФИО арендатора", FieldType::Text, 4),
            ("16", "property_description", "Описание помещения", FieldType::Textarea, 5),
        ],
        _ => return Vec::new(),
    };

    rows.iter()
        .map(|(id, field_name, display_name, field_type, order)| TemplateField {
            id: id.to_string(),
            template_id: template_id.to_string(),
            field_name: field_name.to_string(),
            display_name: display_name.to_string(),
            field_type: *field_type,
            required: true,
            order: *order,
            created_at: Utc::now(),
        })
        .collect()
}
