//! Aggregate exposure math
//!
//! House exposure for a symbol is the absolute value of the net signed
//! quantity across every account's position in that symbol.

use rust_decimal::Decimal;
use types::numeric::Quantity;
use types::order::Side;
use types::position::Position;

/// Net signed quantity across a set of positions.
pub fn net_quantity(positions: &[Position]) -> Decimal {
    positions.iter().map(|p| p.quantity).sum()
}

/// Net quantity after an order of `side` × `quantity` fills completely.
pub fn projected_net(current_net: Decimal, side: Side, quantity: Quantity) -> Decimal {
    current_net + side.sign() * quantity.as_decimal()
}
