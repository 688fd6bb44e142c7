use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

/// Reals per kilowatt-hour, the consumption charge.
pub type KilowattHourRate = Quantity<-1, -1, 1>;

impl Display for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "R$ {:.5}/kWh", self.0)
    }
}

impl Debug for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "R${:.5}/kWh", self.0)
    }
}

/// Reals per kilowatt, the demand charge.
pub type KilowattRate = Quantity<-1, 0, 1>;

impl Display for KilowattRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "R$ {:.2}/kW", self.0)
    }
}

impl Debug for KilowattRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "R${:.2}/kW", self.0)
    }
}
