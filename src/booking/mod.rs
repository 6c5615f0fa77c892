pub mod flow;
pub mod pricing;
pub mod seats;

pub use flow::{BookingFlow, FlowError, FlowSnapshot, Step};
pub use pricing::{DiscountOutcome, PriceBreakdown};
pub use seats::{Seat, SeatGrid, SeatStatus, ToggleResult};
