#![no_std]
#![no_main]

use panic_rtt_target as _;
use rtt_target::{rprintln, rtt_init_print};
use stm32f4xx_hal::{
    i2c::{self, I2c},
    pac,
    prelude::*,
};

use serlcd_driver::{
    lcd::{Config, Lcd},
    sender::I2cSender,
};

// a heart shape
const HEART: [u8; 8] = [
    0b00000, 0b00000, 0b01010, 0b11111, 0b01110, 0b00100, 0b00000, 0b00000,
];

#[cortex_m_rt::entry]
fn main() -> ! {
    rtt_init_print!();

    let dp = pac::Peripherals::take().expect("Cannot take device peripherals");
    let cp = pac::CorePeripherals::take().expect("Cannot take core peripherals");

    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.use_hse(12.MHz()).freeze();

    let mut delayer = cp.SYST.delay(&clocks);

    let gpiob = dp.GPIOB.split();

    // OpenLCD works up to 400 kHz, some clones choke well below that
    let mut i2c = I2c::new(
        dp.I2C1,
        (gpiob.pb6, gpiob.pb7),
        i2c::Mode::standard(50.kHz()),
        &clocks,
    );

    rprintln!("I2C initialized");

    let mut sender = I2cSender::new(&mut i2c);
    let mut lcd = Lcd::new(&mut sender, &mut delayer, Config::default());

    // bright white, then high contrast
    lcd.set_backlight(255, 255, 255);
    lcd.set_contrast(5);

    lcd.create_char(1, &HEART);

    lcd.clear();
    lcd.print("Hello, World!");
    lcd.write_char(1);

    if !lcd.last_delivery().is_ok() {
        rprintln!("display did not take the greeting: {:?}", lcd.last_delivery());
    }

    let mut seconds: u32 = 0;
    loop {
        // column 0 of the second row
        lcd.set_cursor(0, 1);
        lcd.print_integer(seconds);

        lcd.delay_ms(1_000);
        seconds = seconds.wrapping_add(1);
    }
}
