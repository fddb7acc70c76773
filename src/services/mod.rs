pub mod bitacora;
pub mod jwt;
pub mod password;
pub mod storage;
pub mod ventas;
pub mod verificacion;
