/*!
# SerLCD Driver

Driver for the SparkFun SerLCD (OpenLCD firmware) character displays, talking I2C.

Basic Usage:

1. Initialize a "sender" <br/>
    This crate include an I2C sender for any `embedded-hal` bus: [`sender::I2cSender`]

    Or you can use any transport implemented [`sender::SendCommand`].
<br/>
<br/>
2. Use [`lcd::Lcd::new()`] with a [`lcd::Config`] to create a [`lcd::Lcd`], this also initializes the display
<br/>
<br/>
3. use any methods provide by [`lcd::Lcd`] to control the display

```ignore
let mut sender = I2cSender::new(&mut i2c);
let mut lcd = Lcd::new(&mut sender, &mut delay, Config::default());

lcd.set_backlight(255, 255, 255);
lcd.set_contrast(5);
lcd.clear();
lcd.print("Hello, World!");
lcd.set_cursor(0, 1);
lcd.print_integer(42u32);
```

Every call blocks until the display had time to digest the command. Bus failures are
retried (timeouts only) and logged under the `defmt` feature, never returned;
[`lcd::Lcd::last_delivery`] tells what happened to the last transaction.
*/

#![no_std]
#![warn(missing_docs)]

pub mod command;
pub mod lcd;
pub mod sender;
mod state;
pub mod utils;
