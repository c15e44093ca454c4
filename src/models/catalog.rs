// src/models/catalog.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

// --- 1. Categorias ---

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- 2. Atributos ---

// Tipo de dado que um atributo aceita nas especificações.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "attribute_data_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AttributeDataType {
    Text,
    Number,
    Boolean,
    Date,
    Decimal,
}

// Atributo do catálogo global, visível para todas as empresas.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlobalAttribute {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub data_type: AttributeDataType,
    pub unit_of_measure: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Atributo criado por uma empresa, visível só para ela.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomAttribute {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub slug: String,
    pub data_type: AttributeDataType,
    pub unit_of_measure: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

// --- 3. Modelos de produto ---

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha crua da tabela template_attributes (duas FKs anuláveis).
// Fora do banco ela vira `TemplateAttributeDef`, onde o par de
// Options colapsa no enum `AttributeRef`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateAttribute {
    pub id: Uuid,
    pub template_id: Uuid,
    pub global_attribute_id: Option<Uuid>,
    pub custom_attribute_id: Option<Uuid>,
    pub is_required: bool,
    pub default_value: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// Referência a exatamente um atributo. Os estados "ambos" e "nenhum"
// não são representáveis aqui; o banco garante o mesmo via CHECK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", tag = "kind", content = "id")]
pub enum AttributeRef {
    Global(Uuid),
    Custom(Uuid),
}

// Atributo de modelo já resolvido (join com o atributo global/custom).
// É o formato que o validador de especificações consome.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateAttributeDef {
    pub id: Uuid,
    pub attribute: AttributeRef,
    pub slug: String,
    pub name: String,
    pub data_type: AttributeDataType,
    pub unit_of_measure: Option<String>,
    pub is_required: bool,
    pub default_value: Option<String>,
    pub sort_order: i32,
}

// --- 4. Valores de especificação ---

// Valor já validado/coagido de uma especificação. A tag interna carrega
// o tipo; na serialização JSON cada variante vira o literal natural
// (datas e decimais ficam na forma canônica em string).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SpecValue {
    Text(String),
    Number(f64),
    Decimal(String),
    Boolean(bool),
    Date(String),
}

impl SpecValue {
    pub fn into_json(self) -> Value {
        match self {
            SpecValue::Text(s) => Value::String(s),
            SpecValue::Number(n) => serde_json::json!(n),
            SpecValue::Decimal(s) => Value::String(s),
            SpecValue::Boolean(b) => Value::Bool(b),
            SpecValue::Date(s) => Value::String(s),
        }
    }
}
