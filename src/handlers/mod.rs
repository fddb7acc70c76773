pub mod auth;
pub mod carrito;
pub mod categorias;
pub mod citas;
pub mod clientes;
pub mod inventario;
pub mod logs;
pub mod productos;
pub mod root;
pub mod servicios;
pub mod upload;
pub mod usuarios;
pub mod ventas;
pub mod verificacion;
