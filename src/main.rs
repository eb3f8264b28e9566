//! SweepSynth firmware entry point
//!
//! 1. Bring up DAC, sample timer, button interrupt and both UARTs
//! 2. Print the banner
//! 3. Poll the menu and drain the logs forever
//!
//! Both interrupt handlers are thin trampolines into
//! `sweep_synth::interrupts`.

#[cfg(target_os = "espidf")]
mod firmware {
    use core::ffi::c_void;

    use esp_idf_svc::hal::gpio::{AnyIOPin, InterruptType, PinDriver, Pull};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::uart::{self, UartDriver};
    use esp_idf_svc::hal::units::Hertz;
    use esp_idf_svc::sys::{self, EspError};

    use sweep_synth::console::{Menu, VERSION};
    use sweep_synth::hal::esp::{EspBoard, EspEntropy, UartTerminal};
    use sweep_synth::hal::{Board, PINS};
    use sweep_synth::uart_logger::{init_uart_logger, LogUart, UartLogger, UartLoggerConfig};
    use sweep_synth::{
        on_button_edge, on_sample_tick, rt_info, FaultCode, SharedState, CONFIG, MAIN_LOG_STREAM,
    };

    static SHARED: SharedState = SharedState::new(&CONFIG);
    static BOARD: EspBoard = EspBoard::new(&PINS, CONFIG.dac_bits);

    const PERIOD_US: i64 = EspBoard::period_us(CONFIG.sample_rate_hz);

    /// Sample-tick alarm. Returns `false`: no task was woken.
    unsafe extern "C" fn on_alarm(
        _timer: sys::gptimer_handle_t,
        _event: *const sys::gptimer_alarm_event_data_t,
        _ctx: *mut c_void,
    ) -> bool {
        let start = BOARD.now_us();
        on_sample_tick(&SHARED, &BOARD);
        let elapsed = BOARD.now_us() - start;
        if elapsed > PERIOD_US {
            SHARED.fault().set(FaultCode::TickOverrun, elapsed as u32);
        }
        false
    }

    pub fn run() -> Result<(), EspError> {
        let peripherals = Peripherals::take()?;
        let pins = peripherals.pins;

        BOARD.init(CONFIG.sample_rate_hz, on_alarm)?;
        BOARD.write_dac(SHARED.neutral_code());

        let log_uart = init_uart_logger(peripherals.uart2, pins.gpio4, &UartLoggerConfig::default())?;
        let mut log_uart = LogUart(log_uart);

        let terminal_config = uart::config::Config::default().baudrate(Hertz(CONFIG.terminal_baud));
        let terminal_uart = UartDriver::new(
            peripherals.uart0,
            pins.gpio1,
            pins.gpio3,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &terminal_config,
        )?;
        let mut terminal = UartTerminal::new(terminal_uart);

        let mut button = PinDriver::input(pins.gpio0)?;
        if PINS.button.pull_up {
            button.set_pull(Pull::Up)?;
        }
        button.set_interrupt_type(if PINS.button.falling_edge {
            InterruptType::NegEdge
        } else {
            InterruptType::PosEdge
        })?;
        // SAFETY: the handler only touches statics and never blocks
        unsafe {
            button.subscribe(|| {
                on_button_edge(&SHARED, &BOARD);
            })?;
        }
        button.enable_interrupt()?;

        let mut menu = Menu::new(&SHARED, CONFIG);
        let mut logger = UartLogger::new();
        let mut entropy = EspEntropy;

        menu.print_banner(&mut terminal);
        rt_info!(MAIN_LOG_STREAM, BOARD.now_us(), "boot: {}", VERSION);

        loop {
            menu.poll(&mut terminal, &BOARD, &mut entropy);
            logger.poll(&mut log_uart, BOARD.now_us());

            // The driver masks the pin after every edge
            button.enable_interrupt()?;

            unsafe {
                sys::vTaskDelay(1);
            }
        }
    }
}

#[cfg(target_os = "espidf")]
fn main() {
    esp_idf_svc::sys::link_patches();

    if let Err(e) = firmware::run() {
        println!("fatal: {}", e);
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    println!(
        "{}: firmware image, build for target_os = \"espidf\" and flash to an ESP32",
        sweep_synth::console::VERSION
    );
}
