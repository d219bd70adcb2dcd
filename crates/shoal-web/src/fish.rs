//! Fish background: an owned animator context driven by one
//! self-rescheduling `requestAnimationFrame` callback.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use js_sys::Date;
use shoal_core::leaderboard::placeholder_for_status;
use shoal_core::{
    mark_image_failed, FishId, ImagePaths, LoadStrategy, LoopGate, PreloadPlan, PreloadSession, School,
    SiteConfig, SlotChange, Viewport,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlImageElement};

use crate::dom;
use crate::images::load_all;
use crate::net::{fetch_text, probe_cached, sleep};
use crate::storage::BrowserStore;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

thread_local! {
    static ANIMATOR: RefCell<Option<FishAnimator>> = const { RefCell::new(None) };
}

fn with_animator<R>(f: impl FnOnce(&mut FishAnimator) -> R) -> Option<R> {
    ANIMATOR.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn fish_css(container_id: &str) -> String {
    format!(
        "#{container_id} {{ position: fixed; inset: 0; overflow: hidden; pointer-events: none; z-index: -1; }}\n\
         #{container_id} img.fish {{ position: absolute; left: 0; top: 0; height: auto; will-change: transform; opacity: 0.85; }}\n\
         #{container_id} img.fish-placeholder {{ opacity: 0.5; }}"
    )
}

fn current_viewport() -> Viewport {
    let size = web_sys::window().map(|w| {
        let width = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1280.0);
        let height = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(720.0);
        (width, height)
    });
    let (width, height) = size.unwrap_or((1280.0, 720.0));
    Viewport::new(width as f32, height as f32)
}

pub struct FishAnimator {
    school: School,
    sprites: HashMap<FishId, HtmlImageElement>,
    doc: Document,
    container: Element,
    images: ImagePaths,
    gate: LoopGate,
    last_frame_ms: Option<f64>,
    /// Urls whose sprite fell back to a placeholder; drained into the
    /// preload session before its next write.
    failed_urls: Vec<String>,
}

impl FishAnimator {
    fn create(config: &SiteConfig) -> Result<Self, JsValue> {
        let doc = dom::document()?;
        let ids = &config.elements;
        dom::ensure_style(&doc, &ids.fish_style, &fish_css(&ids.fish_background))?;
        let container = dom::ensure_element(&doc, &ids.fish_background, "div")?;

        let seed = (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64;
        let mut school = School::new(current_viewport(), config.fish, seed);
        let placeholders = school.spawn_placeholders(&config.images.known_placeholder);

        let mut animator = Self {
            school,
            sprites: HashMap::new(),
            doc,
            container,
            images: config.images.clone(),
            gate: LoopGate::default(),
            last_frame_ms: None,
            failed_urls: Vec::new(),
        };
        for id in placeholders {
            animator.apply(SlotChange::Spawned(id));
        }
        Ok(animator)
    }

    fn sync_sprite(&mut self, id: FishId) -> Result<(), JsValue> {
        let Some(fish) = self.school.get(id) else {
            return Ok(());
        };
        let img = match self.sprites.get(&id) {
            Some(img) => img.clone(),
            None => {
                let img: HtmlImageElement = dom::el(&self.doc, "img", "")?.dyn_into()?;
                img.set_attribute("aria-hidden", "true")?;
                self.container.append_child(&img)?;
                self.sprites.insert(id, img.clone());
                img
            }
        };
        let state = if fish.is_placeholder() { "fish-placeholder" } else { "fish-resolved" };
        img.set_class_name(&format!("fish {state} fish-{}", fish.status.as_tag().to_ascii_lowercase()));
        img.set_alt(&fish.name);
        img.set_width(fish.size as u32);

        let url = fish.image_url.as_str();
        if img.get_attribute("src").as_deref() != Some(url) {
            let fallback = placeholder_for_status(fish.status, &self.images);
            if fallback == url {
                img.set_onerror(None);
            } else {
                let failed = url.to_string();
                dom::on_error_once(&img, fallback, move || {
                    log::debug!("fish: {failed} failed, showing placeholder");
                    mark_image_failed(&mut BrowserStore::open(), &failed);
                    with_animator(|a| a.failed_urls.push(failed));
                });
            }
            img.set_src(url);
        }
        Ok(())
    }

    fn apply(&mut self, change: SlotChange) {
        match change {
            SlotChange::Converted(id) | SlotChange::Spawned(id) => {
                if let Err(err) = self.sync_sprite(id) {
                    log::warn!("fish: sprite {} not updated: {err:?}", id.0);
                }
            }
            SlotChange::Removed(id) => {
                if let Some(img) = self.sprites.remove(&id) {
                    img.remove();
                }
            }
            SlotChange::Unchanged => {}
        }
    }

    fn apply_all(&mut self, changes: Vec<SlotChange>) {
        for change in changes {
            self.apply(change);
        }
    }

    fn tick(&mut self, now_ms: f64) {
        let dt = self
            .last_frame_ms
            .map(|last| ((now_ms - last) / 1000.0) as f32)
            .unwrap_or(0.0);
        self.last_frame_ms = Some(now_ms);
        self.school.frame(dt);

        let time = self.school.elapsed();
        let cfg = self.school.config();
        for fish in self.school.iter() {
            if let Some(img) = self.sprites.get(&fish.id) {
                dom::set_style(img, "transform", &fish.transform(time, cfg).css());
            }
        }
    }
}

fn start_loop(generation: u32) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let handle = callback.clone();

    *callback.borrow_mut() = Some(Closure::new(move |now_ms: f64| {
        let keep_going = with_animator(|a| {
            let admitted = a.gate.admits(generation);
            if admitted {
                a.tick(now_ms);
            }
            admitted
        })
        .unwrap_or(false);
        if !keep_going {
            return;
        }
        if let (Some(window), Some(cb)) = (web_sys::window(), handle.borrow().as_ref()) {
            if let Err(err) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                log::error!("fish: requestAnimationFrame failed: {err:?}");
            }
        }
    }));

    if let Some(cb) = callback.borrow().as_ref() {
        window.request_animation_frame(cb.as_ref().unchecked_ref())?;
    }
    Ok(())
}

fn listen_for_resize() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let on_resize = Closure::<dyn FnMut()>::new(|| {
        with_animator(|a| a.school.resize(current_viewport()));
    });
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();
    Ok(())
}

/// Fetch the directory, then turn placeholders into real fish batch by batch.
async fn populate(config: SiteConfig) {
    let cfg = config.fish;
    let mut session = PreloadSession::restore(BrowserStore::open(), &cfg, Date::now());

    let groups = match session.directory.fresh(Date::now()) {
        Some(groups) => {
            log::debug!("fish: directory served from session cache");
            groups.to_vec()
        }
        None => {
            let result = fetch_text(&config.directory_url).await;
            session.directory.accept(result, Date::now())
        }
    };
    session.persist();

    let plan = PreloadPlan::from_groups(&groups);
    with_animator(|a| {
        let changes = a.school.begin_resolve(plan.len());
        a.apply_all(changes);
    });

    let first_cached = match plan.first() {
        Some(item) => session.images.is_loaded(&item.url) || probe_cached(&item.url).await,
        None => false,
    };
    let strategy = LoadStrategy::choose(first_cached, &cfg);
    log::info!("fish: loading {} images ({strategy:?})", plan.len());

    let batches = plan.batches(strategy);
    for (index, batch) in batches.iter().enumerate() {
        let pending = session.pending(&plan, batch);
        let urls: Vec<String> = pending.iter().map(|&slot| plan.items()[slot].url.clone()).collect();
        let outcomes = load_all(&urls).await;
        let loaded: Vec<(usize, bool)> = pending.into_iter().zip(outcomes).collect();
        for (slot, ok) in &loaded {
            if !ok {
                log::debug!("fish: image failed: {}", plan.items()[*slot].url);
            }
        }

        with_animator(|a| {
            for url in a.failed_urls.drain(..) {
                session.record_image(&url, false);
            }
            let changes = session.settle_batch(&mut a.school, &plan, batch, &loaded);
            a.apply_all(changes);
        });

        if let Some(ms) = strategy.pause_after(index, batches.len()) {
            sleep(ms).await;
        }
    }

    let fallback = config.images.known_placeholder.clone();
    with_animator(|a| {
        let changes = a.school.finish(&fallback);
        a.apply_all(changes);
        log::info!("fish: {} fish swimming", a.school.len());
    });
}

pub fn start(config: SiteConfig) -> Result<(), JsValue> {
    let resumed = with_animator(|a| {
        let generation = a.gate.start();
        if generation.is_some() {
            a.last_frame_ms = None;
        }
        generation
    });
    match resumed {
        Some(None) => {
            log::debug!("fish: already running");
            Ok(())
        }
        Some(Some(generation)) => start_loop(generation),
        None => {
            let mut animator = FishAnimator::create(&config)?;
            let generation = animator.gate.start().unwrap_or_default();
            ANIMATOR.with(|cell| *cell.borrow_mut() = Some(animator));
            listen_for_resize()?;
            spawn_local(populate(config));
            start_loop(generation)
        }
    }
}

pub fn stop() {
    let was_running = with_animator(|a| {
        a.last_frame_ms = None;
        a.gate.stop()
    });
    if was_running == Some(true) {
        log::info!("fish: stopped");
    }
}

pub fn count() -> u32 {
    with_animator(|a| a.school.len() as u32).unwrap_or(0)
}
