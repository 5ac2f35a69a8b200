mod driver;
mod emulator;

use std::cell::RefCell;
use std::path::Path;

use driver::ansiterm::AnsiTerm;
use driver::minifb::Minifb;
use driver::rodio::Rodio;
use driver::termion::Termion;
use emulator::Emulator;

/// Mirrors the original interpreter's `ExitCode.hpp`.
#[repr(i32)]
enum ExitCode {
    CommandLineArgsParseError = 1,
    WindowInitializationFailure = 2,
    AudioInitializationFailure = 3,
    RomLoadFailure = 4,
    CpuError = 5,
}

struct Args {
    rom: String,
    gui: bool,
    native_audio: bool,
    emu_clock_hz: u32,
    verbose: bool,
}

fn parse_args() -> Result<Args, lexopt::Error> {
    use lexopt::prelude::*;

    let help_msg = "\
USAGE:
    chippity [OPTIONS] [ROM]

ARGS:
    <ROM>    Filepath to the CHIP-8 ROM to be read by the emulator. A list of
             ROMs released to the public domain can be found at:
                 - https://zophar.net/pdroms/chip8/chip-8-games-pack.html
                 - https://johnearnest.github.io/chip8Archive/?sort=platform

OPTIONS:
    -h, --help          Print this help message.
    -g, --gui           GUI mode — run this program in a native window.
    -t, --tui           TUI mode — run this program in the terminal. (default)
    -a                  Use the native audio host API. You may want to enable
                          this if your terminal emulator does not support the
                          BEL control code. Enabled by default with --gui.
    -f, --freq=NUM      Set the clock rate of the emulator (Hz) to uint NUM
                          in the range 1-2000. (default: 720)
    -v, --verbose       Raise the log level (info, then debug with -vv).

KEYMAP:
    +---+---+---+---+
    | 1 | 2 | 3 | 4 |
    +---+---+---+---+
    | Q | W | E | R |
    +---+---+---+---+
    | A | S | D | F |
    +---+---+---+---+
    | Z | X | C | V |
    +---+---+---+---+    ";

    let mut rom = None;
    let mut gui = false;
    let mut native_audio = false;
    let mut emu_clock_hz = emulator::DEFAULT_CLOCK_FREQ as u32;
    let mut verbose = false;

    let mut parser = lexopt::Parser::from_env();

    while let Some(arg) = parser.next()? {
        match arg {
            Short('g') | Long("gui") => {
                gui = true;
                native_audio = true;
            }
            Short('t') | Long("tui") => {
                gui = false;
            }
            Short('a') => {
                native_audio = true;
            }
            Short('f') | Long("freq") => {
                emu_clock_hz = parser.value()?.parse()?;
                if !(1..=2000).contains(&emu_clock_hz) {
                    return Err("out of bounds value for option '--freq'".into());
                }
            }
            Short('v') | Long("verbose") => {
                verbose = true;
            }
            Value(path) if rom.is_none() => {
                rom = Some(path.string()?);
            }

            Short('h') | Long("help") => {
                println!("{}", help_msg);
                std::process::exit(0);
            }
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(Args {
        rom: rom.ok_or(
            "missing argument <ROM>\n
  Refer to --help for more information",
        )?,
        gui,
        native_audio,
        emu_clock_hz,
        verbose,
    })
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(ExitCode::CommandLineArgsParseError as i32);
        }
    };

    init_logging(args.verbose);

    let program_name = Path::new(&args.rom)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("rom");

    if args.gui {
        run_gui(&args, program_name);
    } else {
        run_tui(&args);
    }
}

fn run_gui(args: &Args, program_name: &str) {
    let gui = match Minifb::new(program_name) {
        Ok(gui) => RefCell::new(gui),
        Err(err) => {
            log::error!("failed to open display window: {err}");
            std::process::exit(ExitCode::WindowInitializationFailure as i32);
        }
    };

    let speaker: RefCell<Box<dyn driver::AudioDevice>> = if args.native_audio {
        match Rodio::new() {
            Ok(rodio) => RefCell::new(Box::new(rodio)),
            Err(err) => {
                log::error!("failed to open audio device: {err}");
                std::process::exit(ExitCode::AudioInitializationFailure as i32);
            }
        }
    } else {
        RefCell::new(Box::new(AnsiTerm))
    };

    let mut emu = Emulator::with_peripherals(&gui, &gui, &speaker);
    emu.set_clock_speed(args.emu_clock_hz as f32);
    if let Err(err) = emu.load_program(&args.rom) {
        log::error!("{err}");
        std::process::exit(ExitCode::RomLoadFailure as i32);
    }
    if emu.run().is_err() {
        std::process::exit(ExitCode::CpuError as i32);
    }
}

fn run_tui(args: &Args) {
    let tui = match Termion::new() {
        Ok(tui) => RefCell::new(tui),
        Err(err) => {
            log::error!("failed to open terminal screen: {err}");
            std::process::exit(ExitCode::WindowInitializationFailure as i32);
        }
    };

    let mut emu = Emulator::with_peripherals(&tui, &tui, &tui);
    emu.set_clock_speed(args.emu_clock_hz as f32);
    if let Err(err) = emu.load_program(&args.rom) {
        log::error!("{err}");
        std::process::exit(ExitCode::RomLoadFailure as i32);
    }
    if emu.run().is_err() {
        std::process::exit(ExitCode::CpuError as i32);
    }
}
