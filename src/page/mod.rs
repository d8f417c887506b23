//! Browser glue
//!
//! Wires the landing page's existing markup to the pure modules: icon spin,
//! navigation menu, FAQ accordion, rewards calculator and the Plinko loop.

pub mod dom;

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, KeyboardEvent, MouseEvent, Node};

use crate::engine::Plinko;
use crate::rewards::{self, Projection};
use crate::settings::Settings;
use crate::widgets::{Accordion, NavMenu};
use dom::{DomSurface, query_all, query_one};

type PagePlinko = Plinko<DomSurface, Pcg32>;

// Builds the rewards chart on first use and pushes new projections into it
#[wasm_bindgen(inline_js = "
    export function init_rewards_chart(labels, values, title, tooltips, colors, token) {
        const canvas = document.getElementById('rewardsChart');
        if (!canvas || !window.Chart) {
            return false;
        }
        if (window.Chart.getChart && window.Chart.getChart(canvas)) {
            return update_rewards_chart(labels, values, title, tooltips);
        }
        window.Chart.defaults.font.family = \"'Comic Neue', sans-serif\";
        window.Chart.defaults.font.size = 14;
        new window.Chart(canvas, {
            type: 'bar',
            data: {
                labels: labels,
                datasets: [{
                    label: title,
                    data: values,
                    backgroundColor: colors,
                    borderColor: '#333333',
                    borderWidth: 2,
                    borderSkipped: false,
                    borderRadius: 0,
                }],
            },
            options: {
                responsive: true,
                maintainAspectRatio: false,
                scales: {
                    y: {
                        beginAtZero: true,
                        grid: { color: 'rgba(0, 0, 0, 0.1)', borderDash: [5, 5], drawBorder: false },
                        ticks: { callback: (value) => value.toFixed(0) + ' ' + token },
                    },
                    x: { grid: { display: false } },
                },
                plugins: {
                    tooltip: {
                        callbacks: { label: (context) => tooltips[context.dataIndex] },
                        backgroundColor: '#333333',
                        titleFont: { family: \"'Patrick Hand', cursive\", size: 16 },
                        bodyFont: { family: \"'Comic Neue', cursive\", size: 14 },
                        padding: 12,
                        cornerRadius: 0,
                        displayColors: false,
                    },
                    legend: { display: false },
                },
                animation: { duration: 1000, easing: 'easeOutBounce' },
            },
        });
        canvas.style.imageRendering = 'pixelated';
        return true;
    }

    export function update_rewards_chart(labels, values, title, tooltips) {
        const canvas = document.getElementById('rewardsChart');
        if (!canvas || !window.Chart || !window.Chart.getChart) {
            return false;
        }
        const chart = window.Chart.getChart(canvas);
        if (!chart) {
            return false;
        }
        chart.data.labels = labels;
        chart.data.datasets[0].data = values;
        chart.data.datasets[0].label = title;
        chart.options.plugins.tooltip.callbacks.label = (context) => tooltips[context.dataIndex];
        chart.update();
        return true;
    }
")]
extern "C" {
    fn init_rewards_chart(
        labels: js_sys::Array,
        values: js_sys::Array,
        title: &str,
        tooltips: js_sys::Array,
        colors: js_sys::Array,
        token: &str,
    ) -> bool;

    fn update_rewards_chart(
        labels: js_sys::Array,
        values: js_sys::Array,
        title: &str,
        tooltips: js_sys::Array,
    ) -> bool;
}

/// Wire everything up once the document is parsed
pub fn run() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    if document.ready_state() == "loading" {
        let closure = Closure::once(move |_event: web_sys::Event| init());
        let _ = document.add_event_listener_with_callback(
            "DOMContentLoaded",
            closure.as_ref().unchecked_ref(),
        );
        closure.forget();
    } else {
        init();
    }
}

fn init() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let settings = Settings::load();
    log::info!("Page enhancer starting");

    setup_sun(&document, &settings);
    setup_rewards(&document, &settings);
    setup_menu(&document);
    setup_faq(&document);

    if settings.plinko_enabled() {
        start_plinko(&document, &settings);
    } else {
        log::info!("Plinko disabled by settings");
    }
}

fn setup_sun(document: &Document, settings: &Settings) {
    let Some(sun) = document.get_element_by_id("rotatingSun") else {
        return;
    };
    if !settings.spin_enabled() {
        return;
    }
    let target = sun.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
        let list = target.class_list();
        let _ = list.remove_1("rotate-sun");
        // Force a reflow so the animation restarts
        if let Some(el) = target.dyn_ref::<HtmlElement>() {
            let _ = el.offset_width();
        }
        let _ = list.add_1("rotate-sun");
    });
    let _ = sun.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Labels, values and per-bar tooltip lines as JS arrays
fn chart_series(projection: &Projection) -> (js_sys::Array, js_sys::Array, js_sys::Array) {
    let labels = projection
        .labels
        .iter()
        .map(|l| JsValue::from_str(l))
        .collect::<js_sys::Array>();
    let values = projection
        .values
        .iter()
        .map(|&v| JsValue::from_f64(v))
        .collect::<js_sys::Array>();
    let tooltips = projection
        .values
        .iter()
        .map(|&v| {
            projection
                .tooltip_lines(v)
                .iter()
                .map(|line| JsValue::from_str(line))
                .collect::<js_sys::Array>()
        })
        .collect::<js_sys::Array>();
    (labels, values, tooltips)
}

fn show_projection(document: &Document, stake: u64) {
    let projection = Projection::for_stake(stake);
    let (labels, values, tooltips) = chart_series(&projection);
    if !update_rewards_chart(labels, values, &projection.dataset_label(), tooltips) {
        log::warn!("Rewards chart not found; projection not shown");
        return;
    }

    if let Some(container) = query_one(document, ".rewards-chart-container") {
        let _ = container.class_list().add_1("updated");
        let closure = Closure::once_into_js(move || {
            let _ = container.class_list().remove_1("updated");
        });
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.unchecked_ref(),
                1000,
            );
        }
    }
}

fn setup_rewards(document: &Document, settings: &Settings) {
    let projection = Projection::for_stake(settings.default_stake);
    let (labels, values, tooltips) = chart_series(&projection);
    let colors = projection
        .bar_colors()
        .iter()
        .map(|c| JsValue::from_str(c))
        .collect::<js_sys::Array>();
    if !init_rewards_chart(
        labels,
        values,
        &projection.dataset_label(),
        tooltips,
        colors,
        rewards::TOKEN,
    ) {
        log::debug!("No rewards chart on this page");
        return;
    }

    let input = document
        .get_element_by_id("staking-amount")
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
    let button = document.get_element_by_id("calculate-btn");
    let (Some(input), Some(button)) = (input, button) else {
        return;
    };

    // Digits only
    {
        let target = input.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let clean = rewards::sanitize_amount(&target.value());
            if clean != target.value() {
                target.set_value(&clean);
            }
        });
        let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    {
        let target = input.clone();
        let document = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            show_projection(&document, rewards::parse_stake(&target.value()));
        });
        let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    {
        let target = input.clone();
        let document = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if event.key() == "Enter" {
                event.prevent_default();
                show_projection(&document, rewards::parse_stake(&target.value()));
            }
        });
        let _ =
            input.add_event_listener_with_callback("keypress", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn setup_menu(document: &Document) {
    let (Some(toggle), Some(links)) = (
        query_one(document, ".menu-toggle"),
        query_one(document, ".nav-links"),
    ) else {
        return;
    };
    let nav = query_one(document, ".main-nav");
    let menu = Rc::new(RefCell::new(NavMenu::default()));

    let apply = {
        let toggle = toggle.clone();
        let links = links.clone();
        move |open: bool| {
            let _ = toggle.class_list().toggle_with_force("active", open);
            let _ = links.class_list().toggle_with_force("active", open);
        }
    };

    // Toggle button
    {
        let menu = menu.clone();
        let apply = apply.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            event.stop_propagation();
            let open = menu.borrow_mut().toggle();
            apply(open);
        });
        let _ = toggle.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Click outside the nav closes it
    {
        let menu = menu.clone();
        let apply = apply.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
            let inside = nav.as_ref().map(|nav| nav.contains(target.as_ref()));
            if menu.borrow_mut().click(inside) {
                apply(false);
            }
        });
        let _ =
            document.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Following a link closes it
    for link in query_all(document, ".nav-link") {
        let menu = menu.clone();
        let apply = apply.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            if menu.borrow_mut().follow_link() {
                apply(false);
            }
        });
        let _ = link.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn setup_faq(document: &Document) {
    let items: Rc<Vec<Element>> = Rc::new(query_all(document, ".faq-item"));
    let faq = Rc::new(RefCell::new(Accordion::new(items.len())));

    for (index, item) in items.iter().enumerate() {
        let Some(question) = item.query_selector(".faq-question").ok().flatten() else {
            continue;
        };
        let items = items.clone();
        let faq = faq.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let mut faq = faq.borrow_mut();
            faq.toggle(index);
            for (i, item) in items.iter().enumerate() {
                let _ = item.class_list().toggle_with_force("active", faq.is_open(i));
            }
        });
        let _ =
            question.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn start_plinko(document: &Document, settings: &Settings) {
    let surface = DomSurface::query(document);
    let tuning = surface.tuning();
    let seed = settings.seed_or(js_sys::Date::now() as u64);

    match Plinko::mount(surface, Pcg32::seed_from_u64(seed), tuning) {
        Ok(plinko) => {
            log::info!("Plinko running with seed: {}", seed);
            request_animation_frame(Rc::new(RefCell::new(plinko)));
        }
        // Pages without a board (policy pages) include this script too
        Err(e) => log::debug!("Plinko not started: {}", e),
    }
}

fn request_animation_frame(plinko: Rc<RefCell<PagePlinko>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| {
        frame_loop(plinko, time);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn frame_loop(plinko: Rc<RefCell<PagePlinko>>, time: f64) {
    plinko.borrow_mut().pump(time);
    request_animation_frame(plinko);
}
