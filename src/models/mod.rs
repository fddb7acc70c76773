pub mod carrito;
pub mod categoria;
pub mod cita;
pub mod cliente;
pub mod inventario;
pub mod log;
pub mod producto;
pub mod servicio;
pub mod usuario;
pub mod venta;
pub mod verificacion;
