pub mod booking;
pub mod movie;
pub mod showtime;
pub mod theater;
pub mod user;

pub use booking::{Booking, BookingRequest};
pub use movie::Movie;
pub use showtime::Showtime;
pub use theater::Theater;
pub use user::{AdminAccount, AdminLoginResponse, LoginResponse, RegisterRequest, User};
