use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};
use sdl2::event::Event;
use sdl2::gfx::primitives::DrawRenderer;
use sdl2::keyboard::{Keycode, Scancode};
use sdl2::pixels;
use sdl2::render::WindowCanvas;
use sdl2::EventPump;

use super::{Buzzer, Control, Frontend, KeySource, Screen};
use crate::chip8::{Framebuffer, HEIGHT, KEY_COUNT, WIDTH};
use crate::error::{Chip8Error, Result};

/// left-hand block of a qwerty keyboard, keypad 0x0..=0xF in order
const KEYMAP: [Scancode; KEY_COUNT] = [
    Scancode::Num1,
    Scancode::Num2,
    Scancode::Num3,
    Scancode::Num4,
    Scancode::Q,
    Scancode::W,
    Scancode::E,
    Scancode::R,
    Scancode::A,
    Scancode::S,
    Scancode::D,
    Scancode::F,
    Scancode::Z,
    Scancode::X,
    Scancode::C,
    Scancode::V,
];

const TONE_HZ: f32 = 440.0;

struct SquareWave {
    phase_inc: f32,
    phase: f32,
    volume: f32,
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for x in out.iter_mut() {
            *x = if self.phase <= 0.5 {
                self.volume
            } else {
                -self.volume
            };
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

fn sdl_err(e: impl ToString) -> Chip8Error {
    Chip8Error::Frontend(e.to_string())
}

/// SDL2 window, keyboard and square-wave beeper.
pub struct SdlFrontend {
    canvas: WindowCanvas,
    event_pump: EventPump,
    audio: AudioDevice<SquareWave>,
    scale: i16,
    _context: sdl2::Sdl,
}

impl SdlFrontend {
    pub fn new(scale: u32) -> Result<Self> {
        let scale = scale.clamp(1, 30);
        let sdl_ctx = sdl2::init().map_err(sdl_err)?;
        let video = sdl_ctx.video().map_err(sdl_err)?;

        let window = video
            .window("CHIP-8", WIDTH as u32 * scale, HEIGHT as u32 * scale)
            .position_centered()
            .build()
            .map_err(sdl_err)?;
        let mut canvas = window.into_canvas().build().map_err(sdl_err)?;

        canvas.set_draw_color(pixels::Color::RGB(0, 0, 0));
        canvas.clear();
        canvas.present();

        let audio_subsystem = sdl_ctx.audio().map_err(sdl_err)?;
        let desired = AudioSpecDesired {
            freq: Some(44_100),
            channels: Some(1),
            samples: None,
        };
        let audio = audio_subsystem
            .open_playback(None, &desired, |spec| SquareWave {
                phase_inc: TONE_HZ / spec.freq as f32,
                phase: 0.0,
                volume: 0.25,
            })
            .map_err(sdl_err)?;

        let event_pump = sdl_ctx.event_pump().map_err(sdl_err)?;

        Ok(Self {
            canvas,
            event_pump,
            audio,
            scale: scale as i16,
            _context: sdl_ctx,
        })
    }
}

impl KeySource for SdlFrontend {
    fn key_states(&mut self) -> [bool; KEY_COUNT] {
        let state = self.event_pump.keyboard_state();
        let mut keys = [false; KEY_COUNT];
        for (key, scancode) in keys.iter_mut().zip(KEYMAP.iter()) {
            *key = state.is_scancode_pressed(*scancode);
        }
        keys
    }
}

impl Screen for SdlFrontend {
    fn present(&mut self, framebuffer: &Framebuffer) -> Result<()> {
        let black = pixels::Color::RGB(0, 0, 0);
        let white = pixels::Color::RGB(255, 255, 255);
        self.canvas.set_draw_color(black);
        self.canvas.clear();
        for (i, p) in framebuffer.pixels().iter().enumerate() {
            if !*p {
                continue;
            }
            let i = i as i16;
            let x = (i % WIDTH as i16) * self.scale;
            let y = (i / WIDTH as i16) * self.scale;
            self.canvas
                .box_(x, y, x + self.scale - 1, y + self.scale - 1, white)
                .map_err(sdl_err)?;
        }
        self.canvas.present();
        Ok(())
    }
}

impl Buzzer for SdlFrontend {
    fn start(&mut self) {
        self.audio.resume();
    }

    fn stop(&mut self) {
        self.audio.pause();
    }
}

impl Frontend for SdlFrontend {
    fn pump(&mut self) -> Result<Control> {
        let mut control = Control::default();
        for e in self.event_pump.poll_iter() {
            match e {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => control.quit = true,
                Event::KeyDown {
                    keycode: Some(Keycode::P),
                    repeat: false,
                    ..
                } => control.toggle_pause = !control.toggle_pause,
                Event::KeyDown {
                    keycode: Some(Keycode::Equals),
                    ..
                }
                | Event::KeyDown {
                    keycode: Some(Keycode::KpPlus),
                    ..
                } => control.frequency_delta += 1,
                Event::KeyDown {
                    keycode: Some(Keycode::Minus),
                    ..
                }
                | Event::KeyDown {
                    keycode: Some(Keycode::KpMinus),
                    ..
                } => control.frequency_delta -= 1,
                _ => {}
            }
        }
        Ok(control)
    }
}
