/// Engine time in seconds.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Time(pub f64);

impl Time {
    pub fn advance(self, dt_s: f64) -> Self {
        Time(self.0 + dt_s.max(0.0))
    }
}
