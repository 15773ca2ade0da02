use raypool_core::Color;
use raypool_model::MaterialDesc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub diffuse: Color,
    /// Weights both the Phong highlight and the mirror reflection.
    pub specular: Color,
    pub shininess: f32,
    pub transparency: f32,
    pub refraction_index: f32,
}

impl Material {
    pub fn is_reflective(&self) -> bool {
        self.specular.max_channel() > 0.0
    }

    pub fn is_transparent(&self) -> bool {
        self.transparency > 0.0
    }
}

impl From<&MaterialDesc> for Material {
    fn from(desc: &MaterialDesc) -> Self {
        Self {
            diffuse: Color::from_array(desc.diffuse),
            specular: Color::from_array(desc.specular),
            shininess: desc.shininess,
            transparency: desc.transparency,
            refraction_index: desc.refraction_index,
        }
    }
}
