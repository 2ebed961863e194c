//! Catalog DTOs.
//!
//! # Design
//! Every wire key is named explicitly in snake_case. All fields default when
//! absent, so partial payloads from the service decode cleanly. `Product`
//! omits zero-valued fields on the way out, which means a round trip yields
//! the zero value rather than "absent" for anything left unset.

use serde::{ser::Error as _, Deserialize, Serialize, Serializer};

/// A single SKU within an [`ArticleGroup`], e.g. one size/color combination.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Variation {
    pub id: u64,
    pub name: String,
    pub num_in_stock: i64,
    pub location: String,
    pub item_no: String,
    pub platform_item_no: String,
}

/// Sibling SKUs grouped under one product listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleGroup {
    pub name: String,
    pub variations: Vec<Variation>,
}

impl ArticleGroup {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.variations.is_empty()
    }
}

/// A product listing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Price before discount.
    #[serde(
        rename = "oldprice",
        skip_serializing_if = "is_zero_price",
        serialize_with = "finite_price"
    )]
    pub old_price: f64,
    #[serde(skip_serializing_if = "is_zero_price", serialize_with = "finite_price")]
    pub price: f64,
    /// VAT percentage.
    #[serde(rename = "moms_percent", skip_serializing_if = "is_zero")]
    pub tax_percent: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub num_in_stock: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(rename = "is_blocked_by_fyndiq", skip_serializing_if = "is_false")]
    pub is_blocked: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub item_no: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub platform_item_no: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub location: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "ArticleGroup::is_empty")]
    pub variation_group: ArticleGroup,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

fn is_zero_price(value: &f64) -> bool {
    *value == 0.0
}

/// JSON has no NaN or infinity; refuse them rather than emit `null`.
fn finite_price<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if !value.is_finite() {
        return Err(S::Error::custom(format!("price {value} is not a finite number")));
    }
    serializer.serialize_f64(*value)
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Pagination metadata of a list response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaData {
    pub limit: u64,
    /// Opaque cursor for the following page. `null` decodes to `None`.
    pub next: Option<String>,
    pub offset: u64,
    pub previous: Option<String>,
    pub total_count: u64,
}

/// The `meta` envelope shared by list responses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaResponse {
    pub meta: MetaData,
}

/// One page of products.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductList {
    #[serde(flatten)]
    pub envelope: MetaResponse,
    #[serde(default)]
    pub objects: Vec<Product>,
}

impl ProductList {
    pub fn meta(&self) -> &MetaData {
        &self.envelope.meta
    }

    pub fn total_count(&self) -> u64 {
        self.envelope.meta.total_count
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn full_product() -> Product {
        Product {
            title: "Runner".to_string(),
            description: "Light running shoe".to_string(),
            old_price: 899.0,
            price: 599.5,
            tax_percent: 25,
            num_in_stock: 12,
            state: "for_sale".to_string(),
            is_blocked: true,
            item_no: "RUN-1".to_string(),
            platform_item_no: "9001".to_string(),
            location: "A3".to_string(),
            url: "https://shop.example.com/runner".to_string(),
            variation_group: ArticleGroup {
                name: "Runner sizes".to_string(),
                variations: vec![Variation {
                    id: 7,
                    name: "42".to_string(),
                    num_in_stock: 3,
                    location: "A3-1".to_string(),
                    item_no: "RUN-1-42".to_string(),
                    platform_item_no: "9001-42".to_string(),
                }],
            },
            images: vec!["https://img.example.com/runner.jpg".to_string()],
        }
    }

    #[test]
    fn product_uses_snake_case_wire_names() {
        let value = serde_json::to_value(full_product()).unwrap();
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "description",
                "images",
                "is_blocked_by_fyndiq",
                "item_no",
                "location",
                "moms_percent",
                "num_in_stock",
                "oldprice",
                "platform_item_no",
                "price",
                "state",
                "title",
                "url",
                "variation_group",
            ]
        );
        assert_eq!(value["price"], 599.5);
        assert_eq!(value["variation_group"]["variations"][0]["platform_item_no"], "9001-42");
    }

    #[test]
    fn zero_valued_fields_are_omitted() {
        let product = Product {
            title: "Shoe".to_string(),
            ..Product::default()
        };
        assert_eq!(serde_json::to_value(&product).unwrap(), json!({"title": "Shoe"}));
    }

    #[test]
    fn default_product_serializes_to_empty_object() {
        assert_eq!(serde_json::to_string(&Product::default()).unwrap(), "{}");
    }

    #[test]
    fn product_roundtrips_through_json() {
        let product = full_product();
        let json = serde_json::to_string(&product).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back, product);
    }

    #[test]
    fn non_finite_prices_fail_to_serialize() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let product = Product {
                title: "x".to_string(),
                price: bad,
                ..Product::default()
            };
            let err = serde_json::to_vec(&product).unwrap_err();
            assert!(err.to_string().contains("not a finite number"), "{err}");

            let product = Product {
                old_price: bad,
                ..Product::default()
            };
            assert!(serde_json::to_vec(&product).is_err());
        }
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let product: Product =
            serde_json::from_str(r#"{"id":3,"resource_uri":"/product/3/","title":"Hat"}"#).unwrap();
        assert_eq!(product.title, "Hat");
    }

    #[test]
    fn variation_serializes_every_field() {
        let value = serde_json::to_value(Variation::default()).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 6);
        assert_eq!(value["num_in_stock"], 0);
    }

    #[test]
    fn product_list_decodes_meta_envelope() {
        let body = r#"{"meta":{"limit":10,"next":"","offset":0,"previous":"","total_count":1},"objects":[{"title":"Shoe"}]}"#;
        let list: ProductList = serde_json::from_str(body).unwrap();
        assert_eq!(list.total_count(), 1);
        assert_eq!(list.meta().limit, 10);
        assert_eq!(list.meta().next.as_deref(), Some(""));
        assert_eq!(list.objects.len(), 1);
        assert_eq!(list.objects[0].title, "Shoe");
    }

    #[test]
    fn null_cursors_decode_to_none() {
        let body = r#"{"meta":{"limit":20,"next":null,"offset":0,"previous":null,"total_count":0},"objects":[]}"#;
        let list: ProductList = serde_json::from_str(body).unwrap();
        assert!(list.meta().next.is_none());
        assert!(list.meta().previous.is_none());
        assert!(list.objects.is_empty());
    }

    #[test]
    fn product_list_serializes_meta_at_top_level() {
        let list = ProductList::default();
        let value = serde_json::to_value(&list).unwrap();
        assert!(value.get("meta").is_some());
        assert!(value.get("objects").is_some());
        assert!(value.get("envelope").is_none());
    }
}
