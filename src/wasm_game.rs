// Crossgrid – An interactive crossword grid
// Copyright (C) 2023, 2024  Neil Roberts
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use wasm_bindgen::prelude::*;
use super::answer_key;
use super::grid::Pos;
use super::navigation::Direction;
use super::puzzle::Puzzle;
use super::puzzle_data::Orientation;
use super::render::CellView;
use super::word_index::WordId;

const DEFAULT_SERVER: &'static str = "http://localhost:8000";
const UPLOAD_PATH: &'static str = "/upload-pdf/";

const UPLOAD_FAILED_MESSAGE: &'static str =
    "Failed to generate puzzle. Please check the backend server.";
const NO_FILE_MESSAGE: &'static str = "Please select a file first.";
const NO_ANSWER_KEY_MESSAGE: &'static str =
    "No answer key found. Please generate a puzzle first.";

fn show_error(message: &str) {
    log::error!("{}", message);

    let Some(window) = web_sys::window()
    else {
        return;
    };

    let Some(document) = window.document()
    else {
        return;
    };

    let Some(message_elem) = document.get_element_by_id("message")
    else {
        return;
    };

    message_elem.set_text_content(Some("An error occurred"));
}

struct Context {
    document: web_sys::HtmlDocument,
    window: web_sys::Window,
    message: web_sys::HtmlElement,
}

impl Context {
    fn new() -> Result<Context, String> {
        let Some(window) = web_sys::window()
        else {
            return Err("failed to get window".to_string());
        };

        let Some(document) = window.document()
            .and_then(|d| d.dyn_into::<web_sys::HtmlDocument>().ok())
        else {
            return Err("failed to get document".to_string());
        };

        let Some(message) = document.get_element_by_id("message")
            .and_then(|c| c.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            return Err("failed to get message div".to_string());
        };

        Ok(Context {
            document,
            window,
            message,
        })
    }

    fn get_element<T: JsCast>(&self, id: &str) -> Result<T, String> {
        self.document.get_element_by_id(id)
            .and_then(|c| c.dyn_into::<T>().ok())
            .ok_or_else(|| format!("failed to get {}", id))
    }

    fn show_message(&self, message: &str) {
        set_element_text(&self.message, message);
    }
}

type PromiseClosure = Closure::<dyn FnMut(JsValue)>;

struct ClueItem {
    word_id: WordId,
    element: web_sys::Element,
}

struct Crossgrid {
    context: Context,
    server: String,

    grid_container: web_sys::HtmlElement,
    across_clues: web_sys::Element,
    down_clues: web_sys::Element,
    summary: web_sys::Element,
    file_input: web_sys::HtmlInputElement,

    click_closure: Option<Closure::<dyn Fn(JsValue)>>,
    input_closure: Option<Closure::<dyn Fn(JsValue)>>,
    keydown_closure: Option<Closure::<dyn Fn(JsValue)>>,
    clue_closure: Option<Closure::<dyn Fn(JsValue)>>,
    generate_closure: Option<Closure::<dyn Fn(JsValue)>>,
    check_closure: Option<Closure::<dyn Fn(JsValue)>>,
    reset_closure: Option<Closure::<dyn Fn(JsValue)>>,
    show_answers_closure: Option<Closure::<dyn Fn(JsValue)>>,

    upload_response_closure: Option<PromiseClosure>,
    upload_content_closure: Option<PromiseClosure>,
    upload_error_closure: Option<PromiseClosure>,
    uploading: bool,

    puzzle: Option<Puzzle>,
    // One entry per cell in reading order. None for blocked cells.
    inputs: Vec<Option<web_sys::HtmlInputElement>>,
    clue_items: Vec<ClueItem>,
}

impl Crossgrid {
    fn new(context: Context) -> Result<Box<Crossgrid>, String> {
        let grid_container =
            context.get_element::<web_sys::HtmlElement>("grid-container")?;
        let across_clues =
            context.get_element::<web_sys::Element>("across-clues")?;
        let down_clues = context.get_element::<web_sys::Element>("down-clues")?;
        let summary = context.get_element::<web_sys::Element>("summary")?;
        let file_input =
            context.get_element::<web_sys::HtmlInputElement>("file-input")?;

        let server = get_server(&context);

        log::info!("using puzzle server {}", server);

        let mut crossgrid = Box::new(Crossgrid {
            context,
            server,

            grid_container,
            across_clues,
            down_clues,
            summary,
            file_input,

            click_closure: None,
            input_closure: None,
            keydown_closure: None,
            clue_closure: None,
            generate_closure: None,
            check_closure: None,
            reset_closure: None,
            show_answers_closure: None,

            upload_response_closure: None,
            upload_content_closure: None,
            upload_error_closure: None,
            uploading: false,

            puzzle: None,
            inputs: Vec::new(),
            clue_items: Vec::new(),
        });

        crossgrid.create_closures();
        crossgrid.create_buttons();
        crossgrid.create_upload_closures();

        Ok(crossgrid)
    }

    fn create_closures(&mut self) {
        let crossgrid_pointer = self as *mut Crossgrid;

        let click_closure = Closure::<dyn Fn(JsValue)>::new(
            move |event: JsValue| {
                let crossgrid = unsafe { &mut *crossgrid_pointer };
                let event: web_sys::Event = event.dyn_into().unwrap();
                crossgrid.handle_click_event(event);
            }
        );

        let _ = self.grid_container.add_event_listener_with_callback(
            "click",
            click_closure.as_ref().unchecked_ref(),
        );

        self.click_closure = Some(click_closure);

        let input_closure = Closure::<dyn Fn(JsValue)>::new(
            move |event: JsValue| {
                let crossgrid = unsafe { &mut *crossgrid_pointer };
                let event: web_sys::Event = event.dyn_into().unwrap();
                crossgrid.handle_input_event(event);
            }
        );

        let _ = self.grid_container.add_event_listener_with_callback(
            "input",
            input_closure.as_ref().unchecked_ref(),
        );

        self.input_closure = Some(input_closure);

        let keydown_closure = Closure::<dyn Fn(JsValue)>::new(
            move |event: JsValue| {
                let crossgrid = unsafe { &mut *crossgrid_pointer };
                let event: web_sys::KeyboardEvent = event.dyn_into().unwrap();
                crossgrid.handle_keydown_event(event);
            }
        );

        let _ = self.grid_container.add_event_listener_with_callback(
            "keydown",
            keydown_closure.as_ref().unchecked_ref(),
        );

        self.keydown_closure = Some(keydown_closure);

        let clue_closure = Closure::<dyn Fn(JsValue)>::new(
            move |event: JsValue| {
                let crossgrid = unsafe { &mut *crossgrid_pointer };
                let event: web_sys::Event = event.dyn_into().unwrap();
                crossgrid.handle_clue_click(event);
            }
        );

        for list in [&self.across_clues, &self.down_clues] {
            let _ = list.add_event_listener_with_callback(
                "click",
                clue_closure.as_ref().unchecked_ref(),
            );
        }

        self.clue_closure = Some(clue_closure);
    }

    fn add_button_listener(
        &self,
        id: &str,
        closure: &Closure::<dyn Fn(JsValue)>,
    ) {
        let Some(button) = self.context.document.get_element_by_id(id)
            .and_then(|c| c.dyn_into::<web_sys::EventTarget>().ok())
        else {
            log::warn!("missing button {}", id);
            return;
        };

        let _ = button.add_event_listener_with_callback(
            "click",
            closure.as_ref().unchecked_ref(),
        );
    }

    fn create_buttons(&mut self) {
        let crossgrid_pointer = self as *mut Crossgrid;

        let generate_closure = Closure::<dyn Fn(JsValue)>::new(
            move |_event: JsValue| {
                let crossgrid = unsafe { &mut *crossgrid_pointer };
                crossgrid.start_upload();
            }
        );
        self.add_button_listener("generate-button", &generate_closure);
        self.generate_closure = Some(generate_closure);

        let check_closure = Closure::<dyn Fn(JsValue)>::new(
            move |_event: JsValue| {
                let crossgrid = unsafe { &mut *crossgrid_pointer };
                crossgrid.update_puzzle(|puzzle| {
                    puzzle.check_answers();
                });
            }
        );
        self.add_button_listener("check-button", &check_closure);
        self.check_closure = Some(check_closure);

        let reset_closure = Closure::<dyn Fn(JsValue)>::new(
            move |_event: JsValue| {
                let crossgrid = unsafe { &mut *crossgrid_pointer };
                crossgrid.update_puzzle(Puzzle::reset);
            }
        );
        self.add_button_listener("reset-button", &reset_closure);
        self.reset_closure = Some(reset_closure);

        let show_answers_closure = Closure::<dyn Fn(JsValue)>::new(
            move |_event: JsValue| {
                let crossgrid = unsafe { &mut *crossgrid_pointer };
                crossgrid.update_puzzle(Puzzle::show_answers);
            }
        );
        self.add_button_listener("show-answers-button", &show_answers_closure);
        self.show_answers_closure = Some(show_answers_closure);
    }

    fn create_upload_closures(&mut self) {
        let crossgrid_pointer = self as *mut Crossgrid;

        let response_closure = PromiseClosure::new(move |v: JsValue| {
            let crossgrid = unsafe { &mut *crossgrid_pointer };

            let Some(response) = v.dyn_into::<web_sys::Response>().ok()
                .filter(|response| response.ok())
            else {
                crossgrid.upload_failed("bad response from puzzle server");
                return;
            };

            let promise = match response.json() {
                Ok(p) => p,
                Err(_) => {
                    crossgrid.upload_failed("error fetching json from response");
                    return;
                },
            };

            let (Some(content_closure), Some(error_closure)) = (
                crossgrid.upload_content_closure.as_ref(),
                crossgrid.upload_error_closure.as_ref(),
            )
            else {
                return;
            };

            let _ = promise.then2(content_closure, error_closure);
        });

        let content_closure = PromiseClosure::new(move |v| {
            let crossgrid = unsafe { &mut *crossgrid_pointer };
            crossgrid.puzzle_received(v);
        });

        let error_closure = PromiseClosure::new(move |_| {
            let crossgrid = unsafe { &mut *crossgrid_pointer };
            crossgrid.upload_failed("request to puzzle server failed");
        });

        self.upload_response_closure = Some(response_closure);
        self.upload_content_closure = Some(content_closure);
        self.upload_error_closure = Some(error_closure);
    }

    fn start_upload(&mut self) {
        if self.uploading {
            return;
        }

        let Some(file) = self.file_input.files().and_then(|files| files.get(0))
        else {
            self.context.show_message(NO_FILE_MESSAGE);
            return;
        };

        let Ok(form_data) = web_sys::FormData::new()
        else {
            show_error("Error creating form data");
            return;
        };

        if form_data.append_with_blob("file", &file).is_err() {
            show_error("Error adding file to form data");
            return;
        }

        let (Some(response_closure), Some(error_closure)) = (
            self.upload_response_closure.as_ref(),
            self.upload_error_closure.as_ref(),
        )
        else {
            return;
        };

        let body: &JsValue = form_data.as_ref();

        let mut request_init = web_sys::RequestInit::new();
        request_init.method("POST");
        request_init.body(Some(body));

        let url = format!("{}{}", self.server, UPLOAD_PATH);

        log::info!("uploading {} to {}", file.name(), url);

        let promise = self.context.window.fetch_with_str_and_init(
            &url,
            &request_init,
        );

        let _ = promise.then2(response_closure, error_closure);

        self.uploading = true;
        self.context.show_message("Generating puzzle…");
    }

    fn upload_failed(&mut self, reason: &str) {
        log::error!("{}", reason);

        self.uploading = false;
        self.context.show_message(UPLOAD_FAILED_MESSAGE);
    }

    fn puzzle_received(&mut self, data: JsValue) {
        self.uploading = false;

        let json = match js_sys::JSON::stringify(&data) {
            Ok(json) => String::from(json),
            Err(_) => {
                self.upload_failed("error converting response to a string");
                return;
            },
        };

        match json.parse::<Puzzle>() {
            Ok(puzzle) => {
                if let Err(e) = self.load_puzzle(puzzle) {
                    show_error(&e);
                }
            },
            Err(e) => self.upload_failed(&format!("invalid puzzle: {}", e)),
        }
    }

    // Nothing on the page or in the session changes until every element
    // for the new puzzle has been created
    fn load_puzzle(&mut self, puzzle: Puzzle) -> Result<(), String> {
        let document = &self.context.document;

        let (cells, inputs) = create_cells(document, &puzzle)?;
        let across_items =
            create_clue_items(document, &puzzle, Orientation::Across)?;
        let down_items =
            create_clue_items(document, &puzzle, Orientation::Down)?;

        clear_element(&self.grid_container);

        let _ = self.grid_container.style().set_property(
            "grid-template-columns",
            &format!("repeat({}, 1fr)", puzzle.width()),
        );

        for cell in cells.iter() {
            let _ = self.grid_container.append_with_node_1(cell);
        }

        for (list, items) in [
            (&self.across_clues, &across_items),
            (&self.down_clues, &down_items),
        ] {
            clear_element(list);

            for item in items.iter() {
                let _ = list.append_with_node_1(&item.element);
            }
        }

        self.inputs = inputs;
        self.clue_items = across_items;
        self.clue_items.extend(down_items);

        self.store_answer_key(&puzzle);
        self.puzzle = Some(puzzle);

        self.context.show_message("");
        self.flush_puzzle_changes();

        Ok(())
    }

    fn store_answer_key(&self, puzzle: &Puzzle) {
        let json = match answer_key::to_json(puzzle.grid()) {
            Ok(json) => json,
            Err(e) => {
                log::error!("error writing answer key: {}", e);
                return;
            },
        };

        let Some(session_storage) = get_session_storage(&self.context)
        else {
            return;
        };

        if session_storage.set_item(answer_key::STORAGE_KEY, &json).is_err() {
            log::error!("error saving answer key");
        }
    }

    fn update_cell(&self, row: u32, col: u32) {
        let Some(puzzle) = self.puzzle.as_ref()
        else {
            return;
        };

        let index = (row * puzzle.width() + col) as usize;

        let Some(Some(input)) = self.inputs.get(index)
        else {
            return;
        };

        let view = CellView::new(puzzle, row, col);

        input.set_class_name(&view.class_name());

        let value = view.value_text();

        if input.value() != value {
            input.set_value(&value);
        }
    }

    fn update_active_clue(&self, active_word: Option<WordId>) {
        for item in self.clue_items.iter() {
            let _ = item.element.class_list().toggle_with_force(
                "active",
                Some(item.word_id) == active_word,
            );
        }
    }

    fn focus_cell(&self, (row, col): Pos) {
        let Some(puzzle) = self.puzzle.as_ref()
        else {
            return;
        };

        let index = (row * puzzle.width() + col) as usize;

        if let Some(Some(input)) = self.inputs.get(index) {
            let _ = input.focus();
        }
    }

    fn flush_puzzle_changes(&mut self) {
        let Some(puzzle) = self.puzzle.as_mut()
        else {
            return;
        };

        let changed_cells = puzzle.changed_cells();
        let active_word = puzzle.changed_active_word();
        let focus = puzzle.changed_focus();
        let summary = puzzle.changed_summary();

        for (row, col) in changed_cells {
            self.update_cell(row, col);
        }

        if let Some(active_word) = active_word {
            self.update_active_clue(active_word);
        }

        if let Some(summary) = summary {
            set_element_text(&self.summary, &summary);
        }

        if let Some(focus) = focus {
            self.focus_cell(focus);
        }
    }

    fn update_puzzle<F>(&mut self, func: F)
        where F: FnOnce(&mut Puzzle)
    {
        if let Some(puzzle) = self.puzzle.as_mut() {
            func(puzzle);
            self.flush_puzzle_changes();
        }
    }

    fn handle_click_event(&mut self, event: web_sys::Event) {
        if let Some((row, col)) = cell_for_event(&event) {
            self.update_puzzle(|puzzle| {
                puzzle.select_cell(row, col);
            });
        }
    }

    fn handle_input_event(&mut self, event: web_sys::Event) {
        let Some((row, col)) = cell_for_event(&event)
        else {
            return;
        };

        let Some(input) = event.target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };

        let value = input.value();

        self.update_puzzle(|puzzle| {
            puzzle.type_char(row, col, &value);
        });
    }

    fn handle_keydown_event(&mut self, event: web_sys::KeyboardEvent) {
        let Some((row, col)) = cell_for_event(&event)
        else {
            return;
        };

        let key = event.key();

        if key == "Backspace" {
            event.prevent_default();
            self.update_puzzle(|puzzle| {
                puzzle.backspace(row, col);
            });
        } else if let Some(direction) = Direction::from_key(&key) {
            event.prevent_default();
            self.update_puzzle(|puzzle| {
                puzzle.arrow(direction, row, col);
            });
        }
    }

    fn handle_clue_click(&mut self, event: web_sys::Event) {
        let Some(word_id) = event.target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .and_then(|e| e.closest("li").ok().flatten())
            .and_then(|li| li.get_attribute("data-word"))
            .and_then(|word| word.parse::<WordId>().ok())
        else {
            return;
        };

        self.update_puzzle(|puzzle| {
            puzzle.select_clue(word_id);
        });
    }
}

fn create_cells(
    document: &web_sys::HtmlDocument,
    puzzle: &Puzzle,
) -> Result<
    (Vec<web_sys::Element>, Vec<Option<web_sys::HtmlInputElement>>),
    String,
> {
    let mut cells = Vec::new();
    let mut inputs = Vec::new();

    for (row, col) in puzzle.grid().positions() {
        let Ok(container) = document.create_element("div")
        else {
            return Err("error creating cell".to_string());
        };

        let _ = container.set_attribute("data-row", &row.to_string());
        let _ = container.set_attribute("data-col", &col.to_string());

        if puzzle.grid().is_blocked(row, col) {
            container.set_class_name("cell-container blocked");
            cells.push(container);
            inputs.push(None);
            continue;
        }

        container.set_class_name("cell-container");

        if let Some(number) = puzzle.index().number_at(row, col) {
            let Ok(span) = document.create_element("span")
            else {
                return Err("error creating cell number".to_string());
            };

            span.set_class_name("cell-number");
            set_element_text(&span, &number.to_string());
            let _ = container.append_with_node_1(&span);
        }

        let Some(input) = document.create_element("input").ok()
            .and_then(|i| i.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return Err("error creating cell input".to_string());
        };

        input.set_type("text");
        let _ = input.set_attribute("autocomplete", "off");
        let _ = container.append_with_node_1(&input);

        cells.push(container);
        inputs.push(Some(input));
    }

    Ok((cells, inputs))
}

fn create_clue_items(
    document: &web_sys::HtmlDocument,
    puzzle: &Puzzle,
    orientation: Orientation,
) -> Result<Vec<ClueItem>, String> {
    let mut items = Vec::new();

    for clue in puzzle.clue_list(orientation) {
        let Ok(li) = document.create_element("li")
        else {
            return Err("error creating clue".to_string());
        };

        let _ = li.set_attribute("data-word", &clue.word_id.to_string());
        set_element_text(&li, &format!("{}. {}", clue.number, clue.text));

        items.push(ClueItem {
            word_id: clue.word_id,
            element: li,
        });
    }

    Ok(items)
}

fn cell_for_event(event: &web_sys::Event) -> Option<Pos> {
    let target = event.target()?.dyn_into::<web_sys::Element>().ok()?;
    let container = target.closest(".cell-container").ok()??;
    let row = container.get_attribute("data-row")?.parse::<u32>().ok()?;
    let col = container.get_attribute("data-col")?.parse::<u32>().ok()?;

    Some((row, col))
}

fn clear_element(element: &web_sys::Element) {
    while let Some(child) = element.first_child() {
        let _ = element.remove_child(&child);
    }
}

fn set_element_text(element: &web_sys::Element, text: &str) {
    clear_element(element);

    if let Some(document) = element.owner_document() {
        let text = document.create_text_node(text);
        let _ = element.append_with_node_1(&text);
    }
}

fn get_server(context: &Context) -> String {
    let server = || -> Option<String> {
        let location = context.document.location()?;
        let search = location.search().ok()?;
        let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
        params.get("server")
    };

    server()
        .map(|server| server.trim_end_matches('/').to_string())
        .filter(|server| !server.is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string())
}

fn get_session_storage(context: &Context) -> Option<web_sys::Storage> {
    match context.window.session_storage() {
        Ok(Some(session_storage)) => Some(session_storage),
        Ok(None) => {
            log::warn!("session storage is None");
            None
        },
        Err(_) => {
            log::error!("error getting session storage");
            None
        },
    }
}

fn build_answer_key(context: &Context) -> Result<(), String> {
    let answer_key_elem = context.get_element::<web_sys::Element>("answer-key")?;

    let json = get_session_storage(context)
        .and_then(|storage| storage.get_item(answer_key::STORAGE_KEY).ok())
        .flatten();

    let Some(json) = json
    else {
        context.show_message(NO_ANSWER_KEY_MESSAGE);
        return Ok(());
    };

    let grid = match answer_key::parse(&json) {
        Ok(grid) => grid,
        Err(e) => {
            log::error!("error parsing answer key: {}", e);
            context.show_message(NO_ANSWER_KEY_MESSAGE);
            return Ok(());
        },
    };

    let document = &context.document;

    let Ok(table) = document.create_element("table")
    else {
        return Err("error creating answer key table".to_string());
    };

    for row in 0..grid.height() {
        let Ok(tr) = document.create_element("tr")
        else {
            return Err("error creating answer key row".to_string());
        };

        for col in 0..grid.width() {
            let Ok(td) = document.create_element("td")
            else {
                return Err("error creating answer key cell".to_string());
            };

            match grid.solution(row, col) {
                Some(letter) => set_element_text(&td, &letter.to_string()),
                None => td.set_class_name("blocked"),
            }

            let _ = tr.append_with_node_1(&td);
        }

        let _ = table.append_with_node_1(&tr);
    }

    clear_element(&answer_key_elem);
    let _ = answer_key_elem.append_with_node_1(&table);

    Ok(())
}

fn init_common() -> Result<Context, String> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::log_1(&e.to_string().into());
    }

    Context::new()
}

#[wasm_bindgen]
pub fn init_crossgrid() {
    let context = match init_common() {
        Ok(c) => c,
        Err(e) => {
            show_error(&e);
            return;
        }
    };

    match Crossgrid::new(context) {
        Ok(crossgrid) => {
            // Leak the main crossgrid object so that it will live as
            // long as the web page
            std::mem::forget(crossgrid);
        },
        Err(e) => show_error(&e),
    }
}

#[wasm_bindgen]
pub fn init_answer_key() {
    let context = match init_common() {
        Ok(c) => c,
        Err(e) => {
            show_error(&e);
            return;
        }
    };

    if let Err(e) = build_answer_key(&context) {
        show_error(&e);
    }
}
