//! Shader compilation and program linking.

use web_sys::{WebGlProgram, WebGlRenderingContext as GL, WebGlShader};

use crate::error::{EffectsError, Result, ShaderStage};

/// Compile and link a vertex/fragment pair. Intermediate objects are deleted
/// on failure and the info log is returned in the error.
pub fn link_program(gl: &GL, vertex_src: &str, fragment_src: &str) -> Result<WebGlProgram> {
    let vertex = compile_shader(gl, ShaderStage::Vertex, vertex_src)?;
    let fragment = match compile_shader(gl, ShaderStage::Fragment, fragment_src) {
        Ok(shader) => shader,
        Err(err) => {
            gl.delete_shader(Some(&vertex));
            return Err(err);
        }
    };

    let program = gl
        .create_program()
        .ok_or(EffectsError::Resource("program"))?;
    gl.attach_shader(&program, &vertex);
    gl.attach_shader(&program, &fragment);
    gl.link_program(&program);

    let linked = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if !linked {
        let log = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "unknown program link error".to_owned());
        gl.delete_program(Some(&program));
        gl.delete_shader(Some(&vertex));
        gl.delete_shader(Some(&fragment));
        return Err(EffectsError::ProgramLink(log));
    }
    Ok(program)
}

fn compile_shader(gl: &GL, stage: ShaderStage, source: &str) -> Result<WebGlShader> {
    let kind = match stage {
        ShaderStage::Vertex => GL::VERTEX_SHADER,
        ShaderStage::Fragment => GL::FRAGMENT_SHADER,
    };
    let shader = gl
        .create_shader(kind)
        .ok_or(EffectsError::Resource("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let compiled = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if compiled {
        Ok(shader)
    } else {
        let log = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown shader compile error".to_owned());
        gl.delete_shader(Some(&shader));
        Err(EffectsError::ShaderCompile { stage, log })
    }
}
