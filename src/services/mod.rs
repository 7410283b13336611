pub mod clock_service;
pub mod dispatcher;
pub mod outbound;
pub mod resolver;
pub mod websocket_service;
