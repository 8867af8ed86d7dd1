use js_sys::{Array, Float64Array, Function};
use modscope_core::{
    AmParameters, AngleParameters, ChartSurface, Explanation, FskParameters, KeyingParameters,
    ModulationError, Scheme, Series, SignalParameters, Simulator, WaveformShape,
};
use thiserror::Error;
use wasm_bindgen::prelude::*;

#[derive(Debug, Error)]
#[error("Chart callback failed: {0}")]
pub struct JsSurfaceError(String);

impl From<JsValue> for JsSurfaceError {
    fn from(value: JsValue) -> Self {
        JsSurfaceError(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

/// Forwards charts to JavaScript
///
/// `render(label, color, samples, timeAxis)` is called once per series and
/// returns an opaque chart handle; `destroy(handle)` releases it.
struct JsChartSurface {
    render: Function,
    destroy: Function,
}

impl ChartSurface for JsChartSurface {
    type Widget = Vec<JsValue>;
    type Error = JsSurfaceError;

    fn render(&mut self, series: &[Series], time_axis: &[f64]) -> Result<Vec<JsValue>, JsSurfaceError> {
        let axis = Float64Array::from(time_axis);
        let mut handles = Vec::with_capacity(series.len());

        for s in series {
            let args = Array::of4(
                &JsValue::from_str(s.label),
                &JsValue::from_str(s.color),
                &Float64Array::from(s.samples.as_slice()),
                &axis,
            );
            match self.render.apply(&JsValue::NULL, &args) {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    // Do not leak the charts drawn so far in this pass
                    ChartSurface::destroy(self, handles);
                    return Err(err.into());
                }
            }
        }

        Ok(handles)
    }

    fn destroy(&mut self, handles: Vec<JsValue>) {
        for handle in handles {
            if let Err(err) = self.destroy.call1(&JsValue::NULL, &handle) {
                log::warn!("Chart destroy callback failed: {:?}", err);
            }
        }
    }
}

#[wasm_bindgen]
pub struct WasmExplanation {
    inner: Explanation,
}

#[wasm_bindgen]
impl WasmExplanation {
    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.inner.message.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn carrier(&self) -> String {
        self.inner.carrier.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn index(&self) -> String {
        self.inner.index.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn modulated(&self) -> String {
        self.inner.modulated.clone()
    }
}

/// One modulation view in the browser
///
/// Every `update*` call validates the parameters, regenerates all series and
/// replaces the previous charts. Rejected parameters leave the charts as
/// they were and come back as an error string.
#[wasm_bindgen]
pub struct WasmVisualizer {
    inner: Simulator<JsChartSurface>,
}

#[wasm_bindgen]
impl WasmVisualizer {
    #[wasm_bindgen(constructor)]
    pub fn new(render: Function, destroy: Function) -> WasmVisualizer {
        WasmVisualizer {
            inner: Simulator::new(JsChartSurface { render, destroy }),
        }
    }

    #[wasm_bindgen(js_name = updateAm)]
    #[allow(clippy::too_many_arguments)]
    pub fn update_am(
        &mut self,
        message_amplitude: f64,
        message_frequency: f64,
        message_shape: &str,
        carrier_amplitude: f64,
        carrier_frequency: f64,
        carrier_shape: &str,
    ) -> Result<WasmExplanation, JsValue> {
        let scheme = Scheme::Am(AmParameters {
            message: signal(message_amplitude, message_frequency, message_shape)?,
            carrier: signal(carrier_amplitude, carrier_frequency, carrier_shape)?,
        });
        self.update(&scheme)
    }

    #[wasm_bindgen(js_name = updateFm)]
    #[allow(clippy::too_many_arguments)]
    pub fn update_fm(
        &mut self,
        message_amplitude: f64,
        message_frequency: f64,
        message_shape: &str,
        carrier_amplitude: f64,
        carrier_frequency: f64,
        carrier_shape: &str,
        modulation_index: f64,
    ) -> Result<WasmExplanation, JsValue> {
        let params = angle(
            (message_amplitude, message_frequency, message_shape),
            (carrier_amplitude, carrier_frequency, carrier_shape),
            modulation_index,
        )?;
        self.update(&Scheme::Fm(params))
    }

    #[wasm_bindgen(js_name = updatePm)]
    #[allow(clippy::too_many_arguments)]
    pub fn update_pm(
        &mut self,
        message_amplitude: f64,
        message_frequency: f64,
        message_shape: &str,
        carrier_amplitude: f64,
        carrier_frequency: f64,
        carrier_shape: &str,
        modulation_index: f64,
    ) -> Result<WasmExplanation, JsValue> {
        let params = angle(
            (message_amplitude, message_frequency, message_shape),
            (carrier_amplitude, carrier_frequency, carrier_shape),
            modulation_index,
        )?;
        self.update(&Scheme::Pm(params))
    }

    #[wasm_bindgen(js_name = updateAsk)]
    pub fn update_ask(
        &mut self,
        bit_stream: String,
        carrier_amplitude: f64,
        carrier_frequency: f64,
        carrier_shape: &str,
    ) -> Result<WasmExplanation, JsValue> {
        let scheme = Scheme::Ask(KeyingParameters {
            bit_stream,
            carrier: signal(carrier_amplitude, carrier_frequency, carrier_shape)?,
        });
        self.update(&scheme)
    }

    #[wasm_bindgen(js_name = updateFsk)]
    pub fn update_fsk(
        &mut self,
        bit_stream: String,
        carrier_amplitude: f64,
        frequency0: f64,
        frequency1: f64,
        carrier_shape: &str,
    ) -> Result<WasmExplanation, JsValue> {
        let scheme = Scheme::Fsk(FskParameters {
            bit_stream,
            carrier_amplitude,
            frequency0,
            frequency1,
            shape: shape(carrier_shape)?,
        });
        self.update(&scheme)
    }

    #[wasm_bindgen(js_name = updateBpsk)]
    pub fn update_bpsk(
        &mut self,
        bit_stream: String,
        carrier_amplitude: f64,
        carrier_frequency: f64,
        carrier_shape: &str,
    ) -> Result<WasmExplanation, JsValue> {
        let scheme = Scheme::Bpsk(KeyingParameters {
            bit_stream,
            carrier: signal(carrier_amplitude, carrier_frequency, carrier_shape)?,
        });
        self.update(&scheme)
    }

    /// Destroy the live charts, e.g. when the view is unmounted
    pub fn release(&mut self) {
        self.inner.release();
    }
}

impl WasmVisualizer {
    fn update(&mut self, scheme: &Scheme) -> Result<WasmExplanation, JsValue> {
        self.inner
            .update(scheme)
            .map(|inner| WasmExplanation { inner })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

fn shape(name: &str) -> Result<WaveformShape, JsValue> {
    name.parse()
        .map_err(|e: ModulationError| JsValue::from_str(&e.to_string()))
}

fn signal(amplitude: f64, frequency: f64, shape_name: &str) -> Result<SignalParameters, JsValue> {
    Ok(SignalParameters::new(amplitude, frequency, shape(shape_name)?))
}

fn angle(
    message: (f64, f64, &str),
    carrier: (f64, f64, &str),
    modulation_index: f64,
) -> Result<AngleParameters, JsValue> {
    Ok(AngleParameters {
        message: signal(message.0, message.1, message.2)?,
        carrier: signal(carrier.0, carrier.1, carrier.2)?,
        modulation_index,
    })
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    // A host page may have installed its own logger already
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Console logger already set");
    }
}
