// src/services/specifications.rs

// Motor de validação das especificações dinâmicas de produto.
// O modelo (template) define o schema; aqui cada valor do mapa é
// coagido para o tipo do atributo ou rejeitado. Os erros são coletados
// campo a campo: o chamador recebe todos os problemas de uma vez.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::models::catalog::{AttributeDataType, SpecValue, TemplateAttributeDef};

pub type SpecErrors = BTreeMap<String, String>;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];

pub fn validate_specifications(
    defs: &[TemplateAttributeDef],
    specs: &Map<String, Value>,
) -> Result<BTreeMap<String, SpecValue>, SpecErrors> {
    let mut errors = SpecErrors::new();
    let mut validated: BTreeMap<String, SpecValue> = BTreeMap::new();

    for def in defs {
        let supplied = specs.get(&def.slug).filter(|v| !value_is_absent(v));

        let raw = match (supplied, def.is_required) {
            (Some(value), _) => value.clone(),
            // Opcional sem valor: simplesmente fica de fora
            (None, false) => continue,
            // Obrigatório sem valor: usa o default se houver, senão é erro
            (None, true) => match &def.default_value {
                Some(default) => Value::String(default.clone()),
                None => {
                    errors.insert(def.slug.clone(), format!("{} é obrigatório", def.name));
                    continue;
                }
            },
        };

        match coerce_value(&raw, def.data_type, &def.name) {
            Ok(value) => {
                validated.insert(def.slug.clone(), value);
            }
            Err(message) => {
                errors.insert(def.slug.clone(), message);
            }
        }
    }

    // Chaves fora do schema do modelo não são aceitas
    let known: BTreeSet<&str> = defs.iter().map(|d| d.slug.as_str()).collect();
    for key in specs.keys() {
        if !known.contains(key.as_str()) {
            errors.insert(
                key.clone(),
                "atributo não pertence ao modelo do produto".to_string(),
            );
        }
    }

    if errors.is_empty() { Ok(validated) } else { Err(errors) }
}

/// Converte o mapa validado para o JSON persistido no produto.
pub fn to_json(validated: BTreeMap<String, SpecValue>) -> Value {
    Value::Object(
        validated
            .into_iter()
            .map(|(slug, value)| (slug, value.into_json()))
            .collect(),
    )
}

// Ausente = null ou string em branco. Zero e false contam como presentes.
fn value_is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn coerce_value(
    value: &Value,
    data_type: AttributeDataType,
    attr_name: &str,
) -> Result<SpecValue, String> {
    match data_type {
        AttributeDataType::Text => match value {
            Value::String(s) => Ok(SpecValue::Text(s.trim().to_string())),
            _ => Err(format!("{attr_name} deve ser um texto")),
        },

        AttributeDataType::Number => {
            let parsed = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            parsed
                .map(SpecValue::Number)
                .ok_or_else(|| format!("{attr_name} deve ser um número válido"))
        }

        // Decimais são guardados na forma canônica em string, sem perder precisão.
        AttributeDataType::Decimal => {
            let raw = match value {
                Value::Number(n) => n.to_string(),
                Value::String(s) => s.trim().to_string(),
                _ => return Err(format!("{attr_name} deve ser um decimal válido")),
            };
            Decimal::from_str(&raw)
                .map(|d| SpecValue::Decimal(d.to_string()))
                .map_err(|_| format!("{attr_name} deve ser um decimal válido"))
        }

        AttributeDataType::Boolean => match value {
            Value::Bool(b) => Ok(SpecValue::Boolean(*b)),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "si" | "sí" => Ok(SpecValue::Boolean(true)),
                "false" | "0" | "no" => Ok(SpecValue::Boolean(false)),
                _ => Err(format!("{attr_name} deve ser verdadeiro/falso")),
            },
            _ => Err(format!("{attr_name} deve ser verdadeiro/falso")),
        },

        // Aceita os formatos chilenos usuais e normaliza para YYYY-MM-DD
        AttributeDataType::Date => match value {
            Value::String(s) => {
                let raw = s.trim();
                DATE_FORMATS
                    .iter()
                    .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
                    .map(|date| SpecValue::Date(date.format("%Y-%m-%d").to_string()))
                    .ok_or_else(|| {
                        format!(
                            "{attr_name} deve ser uma data válida (YYYY-MM-DD, DD-MM-YYYY ou DD/MM/YYYY)"
                        )
                    })
            }
            _ => Err(format!("{attr_name} deve ser uma data em texto")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::AttributeRef;
    use serde_json::json;
    use uuid::Uuid;

    fn def(
        slug: &str,
        name: &str,
        data_type: AttributeDataType,
        is_required: bool,
        default_value: Option<&str>,
    ) -> TemplateAttributeDef {
        TemplateAttributeDef {
            id: Uuid::new_v4(),
            attribute: AttributeRef::Global(Uuid::new_v4()),
            slug: slug.to_string(),
            name: name.to_string(),
            data_type,
            unit_of_measure: None,
            is_required,
            default_value: default_value.map(str::to_string),
            sort_order: 0,
        }
    }

    fn as_map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("objeto JSON")
    }

    fn laptop_defs() -> Vec<TemplateAttributeDef> {
        vec![
            def("ram", "RAM", AttributeDataType::Number, true, None),
            def("brand", "Marca", AttributeDataType::Text, false, None),
        ]
    }

    #[test]
    fn obrigatorio_faltando_gera_um_unico_erro() {
        let errors =
            validate_specifications(&laptop_defs(), &as_map(json!({"brand": "HP"}))).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("ram"));
    }

    #[test]
    fn especificacao_completa_valida_e_coage() {
        let validated =
            validate_specifications(&laptop_defs(), &as_map(json!({"brand": "HP", "ram": 8})))
                .unwrap();

        assert_eq!(validated["brand"], SpecValue::Text("HP".to_string()));
        assert_eq!(validated["ram"], SpecValue::Number(8.0));
    }

    #[test]
    fn texto_e_aparado() {
        let defs = vec![def("brand", "Marca", AttributeDataType::Text, false, None)];
        let validated =
            validate_specifications(&defs, &as_map(json!({"brand": "  Dell  "}))).unwrap();
        assert_eq!(validated["brand"], SpecValue::Text("Dell".to_string()));
    }

    #[test]
    fn numero_aceita_string_numerica() {
        let defs = vec![def("ram", "RAM", AttributeDataType::Number, true, None)];
        let validated = validate_specifications(&defs, &as_map(json!({"ram": "16"}))).unwrap();
        assert_eq!(validated["ram"], SpecValue::Number(16.0));
    }

    #[test]
    fn numero_invalido_e_rejeitado() {
        let defs = vec![def("ram", "RAM", AttributeDataType::Number, true, None)];
        let errors =
            validate_specifications(&defs, &as_map(json!({"ram": "muita"}))).unwrap_err();
        assert!(errors["ram"].contains("número"));
    }

    #[test]
    fn decimal_preserva_a_forma_canonica() {
        let defs = vec![def("peso", "Peso", AttributeDataType::Decimal, true, None)];
        let validated =
            validate_specifications(&defs, &as_map(json!({"peso": "1.50"}))).unwrap();
        assert_eq!(validated["peso"], SpecValue::Decimal("1.50".to_string()));
    }

    #[test]
    fn booleano_aceita_o_vocabulario_em_espanhol() {
        let defs = vec![def("novo", "Novo", AttributeDataType::Boolean, true, None)];

        for truthy in ["true", "1", "yes", "si", "sí", "SI", " Sí "] {
            let validated =
                validate_specifications(&defs, &as_map(json!({ "novo": truthy }))).unwrap();
            assert_eq!(validated["novo"], SpecValue::Boolean(true), "{truthy}");
        }

        for falsy in ["false", "0", "no", "NO"] {
            let validated =
                validate_specifications(&defs, &as_map(json!({ "novo": falsy }))).unwrap();
            assert_eq!(validated["novo"], SpecValue::Boolean(false), "{falsy}");
        }

        let errors =
            validate_specifications(&defs, &as_map(json!({"novo": "talvez"}))).unwrap_err();
        assert!(errors.contains_key("novo"));
    }

    #[test]
    fn booleano_falso_conta_como_presente() {
        let defs = vec![def("novo", "Novo", AttributeDataType::Boolean, true, None)];
        let validated = validate_specifications(&defs, &as_map(json!({"novo": false}))).unwrap();
        assert_eq!(validated["novo"], SpecValue::Boolean(false));
    }

    #[test]
    fn data_normaliza_para_iso() {
        let defs = vec![def("compra", "Compra", AttributeDataType::Date, true, None)];

        for input in ["2024-03-05", "05-03-2024", "05/03/2024"] {
            let validated =
                validate_specifications(&defs, &as_map(json!({ "compra": input }))).unwrap();
            assert_eq!(
                validated["compra"],
                SpecValue::Date("2024-03-05".to_string()),
                "{input}"
            );
        }

        let errors =
            validate_specifications(&defs, &as_map(json!({"compra": "03/2024"}))).unwrap_err();
        assert!(errors.contains_key("compra"));
    }

    #[test]
    fn chave_fora_do_modelo_e_erro() {
        let errors = validate_specifications(
            &laptop_defs(),
            &as_map(json!({"ram": 8, "cor": "azul"})),
        )
        .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("cor"));
    }

    #[test]
    fn default_substitui_obrigatorio_ausente() {
        let defs = vec![def("ram", "RAM", AttributeDataType::Number, true, Some("4"))];
        let validated = validate_specifications(&defs, &as_map(json!({}))).unwrap();
        assert_eq!(validated["ram"], SpecValue::Number(4.0));
    }

    #[test]
    fn erros_sao_coletados_todos_de_uma_vez() {
        let defs = vec![
            def("ram", "RAM", AttributeDataType::Number, true, None),
            def("novo", "Novo", AttributeDataType::Boolean, true, None),
        ];
        let errors = validate_specifications(
            &defs,
            &as_map(json!({"novo": "talvez", "cor": "azul"})),
        )
        .unwrap_err();

        // ram ausente + novo inválido + cor desconhecida
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn json_final_usa_os_literais_naturais() {
        let defs = vec![
            def("ram", "RAM", AttributeDataType::Number, true, None),
            def("brand", "Marca", AttributeDataType::Text, false, None),
            def("novo", "Novo", AttributeDataType::Boolean, false, None),
            def("peso", "Peso", AttributeDataType::Decimal, false, None),
        ];
        let validated = validate_specifications(
            &defs,
            &as_map(json!({"ram": 8, "brand": "HP", "novo": "si", "peso": "2.25"})),
        )
        .unwrap();

        let json = to_json(validated);
        assert_eq!(
            json,
            json!({"brand": "HP", "novo": true, "peso": "2.25", "ram": 8.0})
        );
    }
}
