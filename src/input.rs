use gilrs::{Axis, Button, EventType, Gilrs};
use macroquad::prelude::*;

// One-tick snapshot of everything the browser reacts to. Buttons follow the
// Switch layout (A toggle, B continue, X generate, Y sort), which on gilrs'
// Xbox-style naming puts A on East and B on South.
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub page_up: bool,
    pub page_down: bool,
    pub toggle: bool,
    pub toggle_all: bool,
    pub toggle_images: bool,
    pub sort: bool,
    pub generate: bool,
    pub delete: bool,
    pub reload: bool,
    pub exit: bool,
    pub back: bool,
    pub stick_y: f32,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            up: false,
            down: false,
            left: false,
            right: false,
            page_up: false,
            page_down: false,
            toggle: false,
            toggle_all: false,
            toggle_images: false,
            sort: false,
            generate: false,
            delete: false,
            reload: false,
            exit: false,
            back: false,
            stick_y: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.up = false;
        self.down = false;
        self.left = false;
        self.right = false;
        self.page_up = false;
        self.page_down = false;
        self.toggle = false;
        self.toggle_all = false;
        self.toggle_images = false;
        self.sort = false;
        self.generate = false;
        self.delete = false;
        self.reload = false;
        self.exit = false;
        self.back = false;
        self.stick_y = 0.0;
    }

    pub fn update_keyboard(&mut self) {
        self.up = is_key_pressed(KeyCode::Up);
        self.down = is_key_pressed(KeyCode::Down);
        self.left = is_key_pressed(KeyCode::Left);
        self.right = is_key_pressed(KeyCode::Right);
        self.page_up = is_key_pressed(KeyCode::PageUp);
        self.page_down = is_key_pressed(KeyCode::PageDown);
        self.toggle = is_key_pressed(KeyCode::Space);
        self.toggle_all = is_key_pressed(KeyCode::T);
        self.toggle_images = is_key_pressed(KeyCode::I);
        self.sort = is_key_pressed(KeyCode::S);
        self.generate = is_key_pressed(KeyCode::G);
        self.delete = is_key_pressed(KeyCode::D);
        self.reload = is_key_pressed(KeyCode::U);
        self.exit = is_key_pressed(KeyCode::Escape);
        self.back = is_key_pressed(KeyCode::Backspace);
    }

    pub fn update_controller(&mut self, gilrs: &mut Gilrs) {
        // Handle button events
        while let Some(ev) = gilrs.next_event() {
            match ev.event {
                EventType::ButtonPressed(Button::DPadUp, _) => self.up = true,
                EventType::ButtonPressed(Button::DPadDown, _) => self.down = true,
                EventType::ButtonPressed(Button::DPadLeft, _) => self.left = true,
                EventType::ButtonPressed(Button::DPadRight, _) => self.right = true,
                EventType::ButtonPressed(Button::LeftTrigger, _) => self.page_up = true,
                EventType::ButtonPressed(Button::RightTrigger, _) => self.page_down = true,
                EventType::ButtonPressed(Button::East, _) => self.toggle = true,
                EventType::ButtonPressed(Button::South, _) => self.back = true,
                EventType::ButtonPressed(Button::North, _) => self.generate = true,
                EventType::ButtonPressed(Button::West, _) => self.sort = true,
                EventType::ButtonPressed(Button::LeftTrigger2, _) => self.toggle_all = true,
                EventType::ButtonPressed(Button::RightTrigger2, _) => self.toggle_images = true,
                EventType::ButtonPressed(Button::LeftThumb, _) => self.delete = true,
                EventType::ButtonPressed(Button::Select, _) => self.reload = true,
                EventType::ButtonPressed(Button::Start, _) => self.exit = true,
                _ => {}
            }
        }

        // Continuous left stick deflection; the most deflected pad wins.
        for (_, gamepad) in gilrs.gamepads() {
            let y = gamepad.value(Axis::LeftStickY);
            if y.abs() > self.stick_y.abs() {
                self.stick_y = y;
            }
        }
    }
}
