//! ShipCore configuration object and helpers.
mod loading;
mod object;

pub use self::loading::load;
pub use self::loading::Error;
pub use self::object::BackendConf;
pub use self::object::Conf;
