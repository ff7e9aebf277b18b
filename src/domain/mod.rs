pub mod entities;
pub mod impacto;
pub mod session;
