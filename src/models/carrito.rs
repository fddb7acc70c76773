use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cart row joined with the product it references.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ItemCarrito {
    pub id: u64,
    pub usuario_id: u64,
    pub producto_id: u64,
    pub nombre: String,
    pub precio: f64,
    pub imagen_url: Option<String>,
    pub cantidad: i32,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgregarCarrito {
    pub producto_id: u64,
    #[serde(default = "cantidad_predeterminada")]
    pub cantidad: i32,
}

fn cantidad_predeterminada() -> i32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActualizarCantidad {
    pub cantidad: i32,
}

/// Cart contents plus the running total the storefront shows.
#[derive(Debug, Clone, Serialize)]
pub struct ResumenCarrito {
    pub items: Vec<ItemCarrito>,
    pub total: f64,
}

impl ResumenCarrito {
    pub fn new(items: Vec<ItemCarrito>) -> Self {
        let total = items
            .iter()
            .map(|item| item.precio * f64::from(item.cantidad))
            .sum();
        Self { items, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(precio: f64, cantidad: i32) -> ItemCarrito {
        ItemCarrito {
            id: 1,
            usuario_id: 1,
            producto_id: 1,
            nombre: "Champú".to_string(),
            precio,
            imagen_url: None,
            cantidad,
            stock: 10,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn resumen_suma_precio_por_cantidad() {
        let resumen = ResumenCarrito::new(vec![item(10.0, 2), item(5.5, 1)]);
        assert_eq!(resumen.total, 25.5);
    }

    #[test]
    fn resumen_vacio_tiene_total_cero() {
        let resumen = ResumenCarrito::new(vec![]);
        assert_eq!(resumen.total, 0.0);
    }

    #[test]
    fn agregar_carrito_usa_cantidad_uno_por_defecto() {
        let body: AgregarCarrito = serde_json::from_str(r#"{"producto_id": 3}"#).unwrap();
        assert_eq!(body.cantidad, 1);
    }
}
