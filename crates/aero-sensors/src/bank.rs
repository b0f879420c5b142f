/// Trait over the three onboard sensor drivers.
///
/// Each read is synchronous and always returns a value — the sensor
/// collaborators expose no error channel. Implementations that can hit a
/// transient read fault absorb it (log and repeat the last good value).
pub trait SensorBank: Send {
    /// Temperature in degrees Celsius.
    fn read_temperature(&mut self) -> f64;

    /// Relative humidity in percent.
    fn read_humidity(&mut self) -> f64;

    /// Barometric pressure in hectopascal.
    fn read_pressure(&mut self) -> f64;
}

impl<T: SensorBank + ?Sized> SensorBank for Box<T> {
    fn read_temperature(&mut self) -> f64 {
        (**self).read_temperature()
    }

    fn read_humidity(&mut self) -> f64 {
        (**self).read_humidity()
    }

    fn read_pressure(&mut self) -> f64 {
        (**self).read_pressure()
    }
}
