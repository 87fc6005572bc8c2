// wt-core/src/units.rs

use uom::si::f64::{
    AngularVelocity as UomAngularVelocity, Area as UomArea, Length as UomLength,
    Power as UomPower,
};

// Public canonical unit types (SI, f64)
pub type AngularVel = UomAngularVelocity;
pub type Area = UomArea;
pub type Length = UomLength;
pub type Power = UomPower;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn kw(v: f64) -> Power {
    use uom::si::power::kilowatt;
    Power::new::<kilowatt>(v)
}

#[inline]
pub fn watts(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn rad_per_s(v: f64) -> AngularVel {
    use uom::si::angular_velocity::radian_per_second;
    AngularVel::new::<radian_per_second>(v)
}

/// Rotor speed in revolutions per minute.
#[inline]
pub fn to_rpm(omega: AngularVel) -> f64 {
    use uom::si::angular_velocity::revolution_per_minute;
    omega.get::<revolution_per_minute>()
}

/// Power in kilowatts.
#[inline]
pub fn to_kw(p: Power) -> f64 {
    use uom::si::power::kilowatt;
    p.get::<kilowatt>()
}

pub mod constants {
    /// Sea-level standard air density (kg/m³).
    pub const RHO_AIR_STD: f64 = 1.225;

    /// Lowest wind speed used as a divisor (m/s).
    pub const WIND_SPEED_FLOOR_MPS: f64 = 0.1;

    /// Lowest rotor speed used when converting power to torque (rad/s).
    pub const TORQUE_OMEGA_FLOOR_RAD_S: f64 = 0.2;
}
